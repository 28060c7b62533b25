//! Pipeline - send / publish の内部処理
//!
//! - **chain**: middleware を terminal action の周りに畳み込む
//! - **router**: Command に対して唯一の Handler を選ぶ
//! - **dispatcher**: Notification を handler ごとの Task に変換

pub mod chain;
pub mod dispatcher;
pub mod router;

pub use self::chain::Continuation;
pub use self::dispatcher::NotificationDispatcher;
pub use self::router::Router;
