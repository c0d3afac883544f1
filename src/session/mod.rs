use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::error::{ErrorCode, classify_error};
use crate::models::request::PairRequest;

/// Maximum line size for session input: 1 MB.
const MAX_LINE_SIZE: usize = 1024 * 1024;

/// Run an NDJSON streaming session: read requests from stdin, process, write responses to stdout.
pub fn run_session(handler: impl Fn(PairRequest) -> Result<serde_json::Value>) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(stdin.lock(), io::BufWriter::new(stdout.lock()), handler)
}

/// Session loop over arbitrary reader/writer pairs.
pub fn serve<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    handler: impl Fn(PairRequest) -> Result<serde_json::Value>,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = if trimmed.len() > MAX_LINE_SIZE {
            error_value(
                &ErrorCode::InvalidRequest.to_string(),
                &format!(
                    "Input line exceeds maximum size ({} bytes > {} bytes)",
                    trimmed.len(),
                    MAX_LINE_SIZE
                ),
            )
        } else {
            match serde_json::from_str::<PairRequest>(trimmed) {
                Ok(req) => handler(req).unwrap_or_else(|e| {
                    let (code, message) = classify_error(&e);
                    error_value(&code, &message)
                }),
                Err(e) => error_value(
                    &ErrorCode::InvalidRequest.to_string(),
                    &format!("Invalid JSON request: {e}"),
                ),
            }
        };

        serde_json::to_writer(&mut out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    Ok(())
}

fn error_value(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "error": { "code": code, "message": message } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PairError;
    use crate::models::request::Command;

    fn run(input: &str) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        serve(input.as_bytes(), &mut out, |req| match req.command {
            Command::Doctor => Ok(serde_json::json!({ "ok": true })),
            _ => Err(PairError::invalid_window("nope").into()),
        })
        .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn one_response_per_request() {
        let responses = run("{\"command\":\"doctor\"}\n\n{\"command\":\"doctor\"}\n");
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["ok"], true);
    }

    #[test]
    fn handler_errors_keep_their_code() {
        let responses = run("{\"command\":\"matrix\"}\n");
        assert_eq!(responses[0]["error"]["code"], "INVALID_WINDOW");
    }

    #[test]
    fn bad_json_is_reported_and_session_continues() {
        let responses = run("not json\n{\"command\":\"doctor\"}\n");
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], "INVALID_REQUEST");
        assert_eq!(responses[1]["ok"], true);
    }
}
