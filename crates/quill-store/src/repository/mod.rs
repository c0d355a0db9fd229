//! Orchestrators composing the stores into the operations request handlers
//! consume. Absence becomes a typed not-found error here, where the business
//! meaning is known; authorization is an explicit author-id comparison
//! before any mutation.

mod articles;
mod comments;
mod profiles;
mod users;

pub use articles::ArticleRepository;
pub use comments::CommentRepository;
pub use profiles::ProfileRepository;
pub use users::UserRepository;
