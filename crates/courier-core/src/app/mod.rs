//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **MediatorBuilder**: handler / middleware / strategy のワイヤリング
//! - **Mediator**: `send` / `publish` の入口
//! - **MediatorConfig**: serde で読み込める設定

pub mod builder;
pub mod config;
pub mod mediator;

pub use self::builder::MediatorBuilder;
pub use self::config::MediatorConfig;
pub use self::mediator::Mediator;
