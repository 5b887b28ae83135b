//! Minimal STOMP 1.2 frame layer for the live-update channel.
//!
//! Only the frames the broker exchange actually uses are covered: outgoing
//! `CONNECT`/`SUBSCRIBE`, incoming `CONNECTED`/`MESSAGE`/`ERROR`, and the
//! single-newline heartbeat. Header escaping is not implemented; none of the
//! fixed headers used here need it.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub command: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// A lone EOL, sent by brokers as a keep-alive. Not an error condition;
    /// callers skip these.
    #[error("heartbeat frame")]
    Heartbeat,
    #[error("frame has no command line")]
    MissingCommand,
    #[error("malformed header line: {0}")]
    MalformedHeader(String),
}

impl Frame {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Client handshake. The bearer token rides along so the broker can
    /// bind the connection to the authenticated user.
    pub fn connect(host: &str, token: Option<&str>) -> Self {
        let frame = Frame::new("CONNECT")
            .with_header("accept-version", "1.2")
            .with_header("host", host);
        match token {
            Some(token) => frame.with_header("Authorization", &format!("Bearer {token}")),
            None => frame,
        }
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new("SUBSCRIBE")
            .with_header("id", id)
            .with_header("destination", destination)
            .with_header("ack", "auto")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn destination(&self) -> Option<&str> {
        self.header("destination")
    }

    /// Wire encoding: command, headers, blank line, body, NUL.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(&self.command);
        out.push('\n');
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push(':');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse a single inbound frame. Tolerates `\r\n` line endings and a
    /// trailing NUL.
    pub fn parse(raw: &str) -> Result<Frame, FrameError> {
        let raw = raw.trim_end_matches('\0');
        if raw.is_empty() || raw == "\n" || raw == "\r\n" {
            return Err(FrameError::Heartbeat);
        }

        let (head, body) = match raw.find("\n\n") {
            Some(idx) => (&raw[..idx], &raw[idx + 2..]),
            None => match raw.find("\r\n\r\n") {
                Some(idx) => (&raw[..idx], &raw[idx + 4..]),
                None => (raw, ""),
            },
        };

        let mut lines = head.lines().map(|l| l.trim_end_matches('\r'));
        let command = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or(FrameError::MissingCommand)?;

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;
            headers.push((name.to_string(), value.to_string()));
        }

        Ok(Frame {
            command: command.to_string(),
            headers,
            body: body.to_string(),
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} headers)", self.command, self.headers.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn connect_frame_encodes_with_bearer() {
        let encoded = Frame::connect("taproom", Some("tok123")).encode();
        assert_eq!(
            encoded,
            "CONNECT\naccept-version:1.2\nhost:taproom\nAuthorization:Bearer tok123\n\n\0"
        );
    }

    #[test]
    fn subscribe_frame_carries_id_and_destination() {
        let frame = Frame::subscribe("sub-0", "/topic/updated/amy@example.com");
        let encoded = frame.encode();
        assert!(encoded.starts_with("SUBSCRIBE\n"));
        assert!(encoded.contains("id:sub-0\n"));
        assert!(encoded.contains("destination:/topic/updated/amy@example.com\n"));
        assert!(encoded.ends_with("\n\n\0"));
    }

    #[test]
    fn message_frame_parses_headers_and_body() {
        let raw = "MESSAGE\ndestination:/topic/updated/amy@example.com\nmessage-id:7\nsubscription:sub-0\n\n{\"uuid\":\"abc\",\"message\":\"FINISHED\"}\0";
        let frame = Frame::parse(raw).unwrap();
        assert_eq!(frame.command, "MESSAGE");
        assert_eq!(
            frame.destination(),
            Some("/topic/updated/amy@example.com")
        );
        assert_eq!(frame.body, r#"{"uuid":"abc","message":"FINISHED"}"#);
    }

    #[test]
    fn parse_tolerates_crlf() {
        let raw = "CONNECTED\r\nversion:1.2\r\n\r\n\0";
        let frame = Frame::parse(raw).unwrap();
        assert_eq!(frame.command, "CONNECTED");
        assert_eq!(frame.header("version"), Some("1.2"));
        assert_eq!(frame.body, "");
    }

    #[test]
    fn heartbeat_and_garbage_are_distinguished() {
        assert_eq!(Frame::parse("\n"), Err(FrameError::Heartbeat));
        assert_eq!(Frame::parse("\0"), Err(FrameError::Heartbeat));
        assert!(matches!(
            Frame::parse("MESSAGE\nbadheader\n\nbody\0"),
            Err(FrameError::MalformedHeader(_))
        ));
    }

    #[test]
    fn round_trip() {
        let mut frame = Frame::subscribe("sub-1", "/topic/request-changed/amy@example.com");
        frame.body = "ignored".to_string();
        let parsed = Frame::parse(&frame.encode()).unwrap();
        assert_eq!(parsed, frame);
    }
}
