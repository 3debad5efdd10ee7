//! Console client: backend API access, upload submission, and the
//! effect-running session behind the console UI.
mod backend;
mod persist;
mod runtime;
mod token;
mod types;

pub use backend::{Backend, ClientSettings, HttpBackend};
pub use persist::{write_secret, PersistError};
pub use runtime::{ConsoleSession, EffectRunner};
pub use token::TokenStore;
pub use types::{
    AgentRecord, AgentStats, ApiError, AuthData, AuthEnvelope, ChatMessage, ChatReply,
    Conversation, StatusReport, UploadAccept, UserProfile,
};
