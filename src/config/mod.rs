pub mod params;
pub mod schema;

pub use params::{ParamDef, Params};
pub use schema::{
    BrowserConfig, Config, EngageConfig, FeedConfig, LogConfig, LoginConfig, ReplyConfig,
};
