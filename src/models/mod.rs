pub mod appointment;
pub mod event;
pub mod message;
pub mod service;
pub mod session;

pub use appointment::{Appointment, AppointmentStatus};
pub use event::SessionEvent;
pub use message::{ChatMessage, Sender};
pub use service::Service;
pub use session::{BookingStage, ChatSession, SessionData};
