pub mod conversation_service;
pub mod directory_service;
pub mod message_service;
pub mod recruiting_service;

pub use conversation_service::ConversationService;
pub use directory_service::DirectoryService;
pub use message_service::MessageService;
pub use recruiting_service::RecruitingService;
