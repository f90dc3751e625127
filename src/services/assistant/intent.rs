#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    StatusCheck,
    CancelAppointment,
    Reschedule,
    StartBooking,
    Hours,
    Services,
    Payment,
    Promotion,
    HumanHandoff,
    Thanks,
    Goodbye,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::StatusCheck => "status_check",
            Intent::CancelAppointment => "cancel_appointment",
            Intent::Reschedule => "reschedule",
            Intent::StartBooking => "start_booking",
            Intent::Hours => "hours",
            Intent::Services => "services",
            Intent::Payment => "payment",
            Intent::Promotion => "promotion",
            Intent::HumanHandoff => "human_handoff",
            Intent::Thanks => "thanks",
            Intent::Goodbye => "goodbye",
            Intent::Fallback => "fallback",
        }
    }
}

/// Keyword predicate. `Word` matches a whole token (so "oi" does not fire
/// on "oito"); `Contains` is a plain substring test. Matching is
/// case-insensitive and accent-sensitive.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Word(&'static str),
    Contains(&'static str),
}

impl Pattern {
    fn matches(&self, text: &str, tokens: &[&str]) -> bool {
        match self {
            Pattern::Word(w) => tokens.contains(w),
            Pattern::Contains(s) => text.contains(s),
        }
    }
}

/// Ordered rule table. Earlier entries win on ambiguity: "reagendar"
/// contains "agendar" but hits Reschedule first, "meu agendamento" hits
/// StatusCheck before StartBooking could see it.
pub const RULES: &[(Intent, &[Pattern])] = &[
    (
        Intent::Greeting,
        &[
            Pattern::Word("oi"),
            Pattern::Word("olá"),
            Pattern::Contains("bom dia"),
            Pattern::Contains("boa tarde"),
            Pattern::Contains("boa noite"),
        ],
    ),
    (
        Intent::StatusCheck,
        &[
            Pattern::Contains("meu agendamento"),
            Pattern::Contains("meus agendamentos"),
            Pattern::Contains("meu horário"),
            Pattern::Contains("minha consulta"),
            Pattern::Contains("tenho horário"),
        ],
    ),
    (
        Intent::CancelAppointment,
        &[Pattern::Word("cancelar"), Pattern::Contains("desmarcar")],
    ),
    (
        Intent::Reschedule,
        &[
            Pattern::Contains("remarcar"),
            Pattern::Contains("reagendar"),
            Pattern::Contains("mudar o horário"),
        ],
    ),
    (
        Intent::StartBooking,
        &[
            Pattern::Contains("agendar"),
            Pattern::Contains("marcar um horário"),
            Pattern::Contains("quero marcar"),
            Pattern::Contains("fazer um agendamento"),
        ],
    ),
    (
        Intent::Hours,
        &[
            Pattern::Contains("horário de funcionamento"),
            Pattern::Contains("que horas"),
            Pattern::Word("abre"),
            Pattern::Word("fecha"),
            Pattern::Contains("funciona"),
        ],
    ),
    (
        Intent::Services,
        &[
            Pattern::Contains("serviço"),
            Pattern::Contains("o que vocês fazem"),
            Pattern::Contains("o que fazem"),
        ],
    ),
    (
        Intent::Payment,
        &[
            Pattern::Contains("pagamento"),
            Pattern::Word("pix"),
            Pattern::Contains("cartão"),
            Pattern::Contains("formas de pagar"),
        ],
    ),
    (
        Intent::Promotion,
        &[Pattern::Contains("promo"), Pattern::Contains("desconto")],
    ),
    (
        Intent::HumanHandoff,
        &[
            Pattern::Contains("atendente"),
            Pattern::Contains("falar com alguém"),
            Pattern::Word("humano"),
        ],
    ),
    (
        Intent::Thanks,
        &[Pattern::Contains("obrigad"), Pattern::Word("valeu")],
    ),
    (
        Intent::Goodbye,
        &[
            Pattern::Word("tchau"),
            Pattern::Contains("até logo"),
            Pattern::Contains("até mais"),
        ],
    ),
];

/// Classify a free-text message. Total: falls back to `Intent::Fallback`,
/// so a reply is always produced.
pub fn classify(message: &str) -> Intent {
    let text = message.to_lowercase();
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    for (intent, patterns) in RULES {
        if patterns.iter().any(|p| p.matches(&text, &tokens)) {
            return *intent;
        }
    }
    Intent::Fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        assert_eq!(classify("Oi!"), Intent::Greeting);
        assert_eq!(classify("olá, tudo bem?"), Intent::Greeting);
        assert_eq!(classify("Bom dia"), Intent::Greeting);
    }

    #[test]
    fn test_word_patterns_respect_token_boundaries() {
        // "oito" must not read as the greeting "oi".
        assert_ne!(classify("oito"), Intent::Greeting);
    }

    #[test]
    fn test_start_booking() {
        assert_eq!(classify("quero agendar"), Intent::StartBooking);
        assert_eq!(classify("Quero marcar um corte"), Intent::StartBooking);
    }

    #[test]
    fn test_reschedule_beats_start_booking() {
        // "reagendar" contains "agendar"; precedence decides.
        assert_eq!(classify("preciso reagendar"), Intent::Reschedule);
    }

    #[test]
    fn test_status_check_beats_start_booking() {
        assert_eq!(classify("qual o meu agendamento?"), Intent::StatusCheck);
    }

    #[test]
    fn test_cancel_and_handoff() {
        assert_eq!(classify("quero cancelar"), Intent::CancelAppointment);
        assert_eq!(classify("quero falar com alguém"), Intent::HumanHandoff);
    }

    #[test]
    fn test_info_intents() {
        assert_eq!(classify("que horas abre?"), Intent::Hours);
        assert_eq!(classify("quais serviços vocês têm?"), Intent::Services);
        assert_eq!(classify("aceitam pix?"), Intent::Payment);
        assert_eq!(classify("tem promoção hoje?"), Intent::Promotion);
    }

    #[test]
    fn test_thanks_goodbye() {
        assert_eq!(classify("obrigada!"), Intent::Thanks);
        assert_eq!(classify("valeu"), Intent::Thanks);
        assert_eq!(classify("tchau"), Intent::Goodbye);
    }

    #[test]
    fn test_fallback_is_total() {
        assert_eq!(classify("xyzzy"), Intent::Fallback);
        assert_eq!(classify(""), Intent::Fallback);
    }

    #[test]
    fn test_greeting_wins_over_booking_in_same_message() {
        // First rule in the table wins, by design.
        assert_eq!(classify("oi, quero agendar"), Intent::Greeting);
    }
}
