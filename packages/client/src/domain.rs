//! Domain logic for client-side operations.
//!
//! Pure functions without side effects, so they are easy to test.

use chatter_shared::protocol::{EXIT_COMMAND, NOT_TAKEN};

/// Interpretation of the server's handshake reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeReply {
    /// The name was accepted. The server may already have sent more text in
    /// the same chunk, which is kept in `remainder`.
    Accepted { remainder: String },
    Rejected,
}

/// Classify the first chunk the server sent after the display name.
///
/// The stream has no framing, so anything starting with `not-taken` counts
/// as acceptance.
pub fn parse_handshake_reply(reply: &str) -> HandshakeReply {
    match reply.strip_prefix(NOT_TAKEN) {
        Some(remainder) => HandshakeReply::Accepted {
            remainder: remainder.to_string(),
        },
        None => HandshakeReply::Rejected,
    }
}

/// What to do with one line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Exit,
    Send(String),
    Ignore,
}

/// Classify one line typed by the user.
///
/// Only the exact `/exit` line ends the session; everything else that is not
/// empty is sent verbatim.
pub fn classify_input(line: &str) -> InputAction {
    if line == EXIT_COMMAND {
        InputAction::Exit
    } else if line.is_empty() {
        InputAction::Ignore
    } else {
        InputAction::Send(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handshake_reply_not_taken() {
        // テスト項目: not-taken は受け入れとして扱われる
        // given (前提条件):
        let reply = "not-taken";

        // when (操作):
        let result = parse_handshake_reply(reply);

        // then (期待する結果):
        assert_eq!(
            result,
            HandshakeReply::Accepted {
                remainder: String::new()
            }
        );
    }

    #[test]
    fn test_parse_handshake_reply_keeps_coalesced_text() {
        // テスト項目: 同じチャンクに続けて届いたテキストは remainder に残る
        // given (前提条件):
        let reply = "not-taken[SERVER] alice connected to server";

        // when (操作):
        let result = parse_handshake_reply(reply);

        // then (期待する結果):
        assert_eq!(
            result,
            HandshakeReply::Accepted {
                remainder: "[SERVER] alice connected to server".to_string()
            }
        );
    }

    #[test]
    fn test_parse_handshake_reply_taken() {
        // テスト項目: taken やその他の応答は拒否として扱われる
        // given (前提条件):
        let replies = ["taken", "", "nope"];

        for reply in replies {
            // when (操作):
            let result = parse_handshake_reply(reply);

            // then (期待する結果):
            assert_eq!(result, HandshakeReply::Rejected, "{:?}", reply);
        }
    }

    #[test]
    fn test_classify_input_exit() {
        // テスト項目: /exit の完全一致だけが終了になる
        // given (前提条件):

        // when (操作):
        let exact = classify_input("/exit");
        let padded = classify_input("/exit ");

        // then (期待する結果):
        assert_eq!(exact, InputAction::Exit);
        assert_eq!(padded, InputAction::Send("/exit ".to_string()));
    }

    #[test]
    fn test_classify_input_ignores_empty_line() {
        // テスト項目: 空行は送信されない
        // given (前提条件):
        let line = "";

        // when (操作):
        let result = classify_input(line);

        // then (期待する結果):
        assert_eq!(result, InputAction::Ignore);
    }

    #[test]
    fn test_classify_input_sends_verbatim() {
        // テスト項目: それ以外の行はそのまま送信される
        // given (前提条件):
        let line = "  hello /kick bob ";

        // when (操作):
        let result = classify_input(line);

        // then (期待する結果):
        assert_eq!(result, InputAction::Send(line.to_string()));
    }
}
