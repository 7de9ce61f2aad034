mod comment;
mod misc;
mod reply;

pub use comment::comment_routes;
pub use misc::misc_routes;
pub use reply::reply_routes;
