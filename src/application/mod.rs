pub mod use_cases;

pub use use_cases::ai_assist::AiAssistUseCase;
pub use use_cases::auth_service::AuthService;
pub use use_cases::contact_service::ContactService;
pub use use_cases::import::{ImportContext, ImportUseCase};
pub use use_cases::listing_service::ListingService;
pub use use_cases::messaging_service::MessagingService;
pub use use_cases::offer_service::OfferService;
pub use use_cases::task_service::TaskService;
