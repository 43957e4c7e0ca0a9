//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `tcp`: 生の TCP ストリームへの書き込みタスクを使った実装

pub mod tcp;

pub use tcp::TcpMessagePusher;
