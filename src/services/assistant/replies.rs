use chrono::NaiveDate;

use crate::models::Appointment;

// Static replies, one per intent.

pub const GREETING: &str =
    "Olá! 😊 Sou a assistente virtual do salão. Posso agendar um horário, \
     tirar dúvidas sobre serviços, preços e muito mais. Como posso ajudar?";

pub const HOURS: &str =
    "Funcionamos de segunda a sábado, das 09:00 às 18:00. Quer aproveitar e agendar um horário?";

pub const PAYMENT: &str =
    "Aceitamos Pix, cartão de crédito, débito e dinheiro. O pagamento é feito no dia do atendimento.";

pub const PROMOTION: &str =
    "Temos promoções que mudam toda semana! Acompanhe nossas redes sociais ou \
     pergunte aqui antes de agendar. 💜";

pub const HUMAN_HANDOFF: &str =
    "Claro! Vou avisar nossa equipe e em breve alguém continua o atendimento por aqui. \
     Enquanto isso, posso adiantar alguma coisa?";

pub const THANKS: &str = "De nada! Qualquer coisa é só chamar. 😊";

pub const GOODBYE: &str = "Até logo! Vamos adorar te receber por aqui. 👋";

pub const CANCEL_INFO: &str =
    "Para cancelar um horário é só falar com nossa equipe pelo telefone ou responder \
     a mensagem de confirmação. Posso ajudar com mais alguma coisa?";

pub const RESCHEDULE_INFO: &str =
    "Para remarcar, o jeito mais rápido é agendar um novo horário por aqui e pedir o \
     cancelamento do antigo. Quer que eu comece um novo agendamento?";

pub const FALLBACK: &str =
    "Desculpe, não entendi. 🤔 Posso ajudar com agendamentos, serviços, horários de \
     funcionamento e formas de pagamento.";

pub const SERVICE_PROMPT: &str = "Ótimo! Qual serviço você gostaria de agendar?";

pub const SERVICE_NOT_RECOGNIZED: &str =
    "Hmm, não reconheci esse serviço. Pode escolher um destes?";

pub const DATE_TIME_INVALID: &str =
    "Não consegui entender a data e o horário, ou esse horário não está disponível. \
     Pode tentar de novo? Por exemplo: \"amanhã às 14h\" ou \"25/08 10:00\".";

pub const CONFIRM_RETRY: &str =
    "Só para confirmar: responda \"sim\" para agendar ou \"não\" para cancelar.";

pub const BOOKING_DECLINED: &str =
    "Sem problemas, agendamento cancelado. Se mudar de ideia é só chamar! 😊";

pub const NO_APPOINTMENTS: &str =
    "Não encontrei nenhum agendamento seu por aqui. Quer marcar um horário?";

pub const ERROR_FALLBACK: &str =
    "Desculpe, estou com dificuldades agora. Pode tentar de novo em instantes?";

// Templated replies.

pub fn services_list(names: &[String]) -> String {
    format!("Oferecemos: {}. Quer agendar algum deles?", names.join(", "))
}

pub fn service_options(names: &[String]) -> String {
    format!("{SERVICE_NOT_RECOGNIZED} {}", names.join(", "))
}

pub fn ask_date_time(service_name: &str) -> String {
    format!(
        "{service_name}, ótima escolha! Para quando você gostaria? \
         Me diga a data e o horário (ex.: \"amanhã às 14h\")."
    )
}

pub fn confirm_prompt(service_name: &str, date: NaiveDate, time: &str) -> String {
    format!(
        "Perfeito! Confirmando: {service_name} em {} às {time}. Posso agendar? (sim/não)",
        date.format("%d/%m/%Y")
    )
}

pub fn booking_confirmed(service_name: &str, date: NaiveDate, time: &str) -> String {
    format!(
        "Agendado! ✅ {service_name} em {} às {time}. Te esperamos!",
        date.format("%d/%m/%Y")
    )
}

pub fn next_appointment(appt: &Appointment) -> String {
    format!(
        "Seu próximo horário: {} em {} às {}. Precisa de mais alguma coisa?",
        appt.service_name,
        appt.date.format("%d/%m/%Y"),
        appt.time
    )
}
