pub mod defaults;
pub mod ids;
pub mod operations;
pub mod path;
pub mod session;

pub use operations::{apply_all, EditError, SectionOp};
pub use session::{EditorSession, SessionError};
