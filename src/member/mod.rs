// Member module
// Registration, password authentication and logout with JWT bearer tokens

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use error::{MemberError, MemberResult};
pub use extract::JsonBody;
pub use handlers::{login_handler, logout_handler, me_handler, register_handler};
pub use middleware::AuthenticatedMember;
pub use models::{Member, MemberResponse, NewMember, Role, SignInRequest, SignUpRequest};
pub use repository::{InMemoryMemberStore, MemberStore, PgMemberStore};
pub use service::MemberService;
pub use session::{CookieSettings, AUTH_COOKIE_NAME};
pub use token::{Claims, TokenService};
