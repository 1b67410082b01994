//! Vision model integration for species identification.
//!
//! Provides a provider abstraction over the vision-language backend (Gemini),
//! a stateless conversation session, and the identifier that turns a reply
//! into a species id.

pub(crate) mod gemini;
pub(crate) mod identifier;
pub(crate) mod provider;
pub(crate) mod session;

pub use identifier::{Identification, Identifier};
pub use provider::{
    resolve_env_var, ChatTurn, Part, Role, UploadedFile, VisionModel, VisionModelFactory,
    VisionResponse,
};
pub use session::ChatSession;
