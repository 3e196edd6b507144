//! STOMP 1.2 frame codec.
//!
//! Only the subset the broker actually speaks: `CONNECT`/`CONNECTED`,
//! `SUBSCRIBE`, `MESSAGE`, `ERROR`, `DISCONNECT`. Frames travel as WebSocket
//! text: command line, header lines, blank line, body, NUL terminator.
//! Heartbeats are negotiated off, so a bare newline between frames never
//! appears on this connection.

use super::ChannelError;

/// A single STOMP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame command (e.g. `MESSAGE`).
    pub command: String,
    /// Header name/value pairs in order of appearance.
    pub headers: Vec<(String, String)>,
    /// Frame body, empty for control frames.
    pub body: String,
}

impl Frame {
    /// Frame with no body.
    #[must_use]
    pub fn control(command: &str, headers: &[(&str, &str)]) -> Self {
        Self {
            command: command.to_string(),
            headers: headers
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
        }
    }

    /// CONNECT frame for the handshake. Heartbeats are disabled; the
    /// WebSocket layer's ping/pong keeps the connection alive.
    #[must_use]
    pub fn connect(host: &str, token: Option<&str>) -> Self {
        let mut frame = Self::control(
            "CONNECT",
            &[
                ("accept-version", "1.2"),
                ("host", host),
                ("heart-beat", "0,0"),
            ],
        );
        if let Some(token) = token {
            frame
                .headers
                .push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        frame
    }

    /// SUBSCRIBE frame for one topic.
    #[must_use]
    pub fn subscribe(id: &str, destination: &str) -> Self {
        Self::control(
            "SUBSCRIBE",
            &[("id", id), ("destination", destination), ("ack", "auto")],
        )
    }

    /// First value for a header name, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize to the wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(64 + self.body.len());
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

    /// Parse one frame from wire text.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Protocol` when the text is not a complete,
    /// well-formed frame.
    pub fn parse(raw: &str) -> Result<Self, ChannelError> {
        let raw = raw
            .strip_suffix('\0')
            .ok_or_else(|| ChannelError::Protocol("frame missing NUL terminator".to_string()))?;

        let (head, body) = raw
            .split_once("\n\n")
            .ok_or_else(|| ChannelError::Protocol("frame missing header separator".to_string()))?;

        let mut lines = head.lines();
        let command = lines
            .next()
            .filter(|line| !line.is_empty())
            .ok_or_else(|| ChannelError::Protocol("frame missing command".to_string()))?
            .to_string();

        let mut headers = Vec::new();
        for line in lines {
            let (name, value) = line.split_once(':').ok_or_else(|| {
                ChannelError::Protocol(format!("malformed header line: {line}"))
            })?;
            headers.push((name.to_string(), value.to_string()));
        }

        Ok(Self {
            command,
            headers,
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_frame_encodes() {
        let frame = Frame::connect("localhost", None);
        let wire = frame.encode();
        assert!(wire.starts_with("CONNECT\n"));
        assert!(wire.contains("accept-version:1.2\n"));
        assert!(wire.contains("heart-beat:0,0\n"));
        assert!(wire.ends_with("\n\n\0"));
    }

    #[test]
    fn test_connect_frame_carries_bearer() {
        let frame = Frame::connect("localhost", Some("tok-1"));
        assert_eq!(frame.header("Authorization"), Some("Bearer tok-1"));
    }

    #[test]
    fn test_message_frame_parses() {
        let wire = "MESSAGE\ndestination:/topic/alerts\nmessage-id:7\n\n{\"id\":3}\0";
        let frame = Frame::parse(wire).unwrap();
        assert_eq!(frame.command, "MESSAGE");
        assert_eq!(frame.header("destination"), Some("/topic/alerts"));
        assert_eq!(frame.body, "{\"id\":3}");
    }

    #[test]
    fn test_roundtrip() {
        let frame = Frame::subscribe("sub-0", "/topic/alerts");
        let parsed = Frame::parse(&frame.encode()).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_parse_rejects_unterminated_frame() {
        assert!(matches!(
            Frame::parse("MESSAGE\n\nbody"),
            Err(ChannelError::Protocol(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_header() {
        assert!(matches!(
            Frame::parse("MESSAGE\nno-colon-here\n\n\0"),
            Err(ChannelError::Protocol(_))
        ));
    }

    #[test]
    fn test_parse_body_may_contain_colons_and_newlines() {
        let wire = "MESSAGE\ndestination:/topic/alerts\n\nline1\nline2: with colon\0";
        let frame = Frame::parse(wire).unwrap();
        assert_eq!(frame.body, "line1\nline2: with colon");
    }
}
