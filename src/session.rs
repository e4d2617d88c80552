use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::advisor::Advisor;
use crate::engineer::RaceEngineer;

pub const SIGN_OFF: &str = "Race Engineer signing off. Good race!";

/// Consecutive read failures tolerated before the input is given up on.
pub const MAX_READ_ERRORS: u32 = 5;

/// Why the read loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Interrupted,
    EndOfInput,
    InputFailed,
}

/// Read telemetry until EOF or `shutdown` resolves. Each line is fully
/// handled before the next one is read, so at most one request is ever in
/// flight. Rendered blocks and the sign-off go to `out`.
pub async fn run<A, R, S, W>(
    engineer: &mut RaceEngineer<A>,
    mut input: R,
    shutdown: S,
    out: &mut W,
) -> io::Result<SessionEnd>
where
    A: Advisor,
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
    W: Write,
{
    writeln!(out, "\nWaiting for telemetry data from the simulation...\n")?;
    out.flush()?;

    tokio::pin!(shutdown);
    let mut buf = Vec::new();
    let mut read_errors = 0;

    let end = loop {
        buf.clear();
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                writeln!(out, "\n\n{SIGN_OFF}")?;
                break SessionEnd::Interrupted;
            }
            read = input.read_until(b'\n', &mut buf) => match read {
                Ok(0) => {
                    tracing::info!("telemetry stream closed");
                    break SessionEnd::EndOfInput;
                }
                Ok(_) => {
                    read_errors = 0;
                    let line = String::from_utf8_lossy(&buf);
                    if let Some(block) = engineer.process_line(&line).await {
                        writeln!(out, "{}", block)?;
                        out.flush()?;
                    }
                }
                Err(e) => {
                    read_errors += 1;
                    tracing::warn!(error = %e, attempt = read_errors, "failed to read telemetry");
                    if read_errors >= MAX_READ_ERRORS {
                        tracing::error!("giving up on the telemetry input");
                        break SessionEnd::InputFailed;
                    }
                }
            }
        }
    };
    out.flush()?;

    let state = engineer.state();
    tracing::info!(
        advisor = %engineer.advisor().label(),
        calls = state.api_calls,
        errors = state.api_errors,
        "session summary"
    );
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::MockAdvisor;
    use crate::gate::EngineerState;
    use crate::types::RaceContext;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    fn engineer() -> RaceEngineer<MockAdvisor> {
        RaceEngineer::new(
            MockAdvisor,
            RaceContext::default(),
            EngineerState::new(Duration::ZERO),
        )
    }

    /// Fails the first `failures` reads, then serves `data`.
    struct Flaky {
        failures: u32,
        data: &'static [u8],
    }

    impl AsyncRead for Flaky {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            if this.failures > 0 {
                this.failures -= 1;
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "device glitch")));
            }
            let n = this.data.len().min(buf.remaining());
            buf.put_slice(&this.data[..n]);
            this.data = &this.data[n..];
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_byte_stream_with_noise_runs_to_eof() {
        let input: &[u8] = b"Starting simulation...\n\
            \xff\xfe{\"driver_id\":1,\"current_lap\":1}\n\
            {\"driver_id\":0,\"driver_name\":\"Ma\xffx\",\"current_lap\":1,\"race_position\":3}\n\
            \n\
            {\"driver_id\":0,\"current_lap\":2.0,\"tire_wear_percent\":null}";
        let mut engineer = engineer();
        let mut out = Vec::new();

        let end = run(&mut engineer, input, std::future::pending(), &mut out)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(out.contains("Waiting for telemetry data"));
        assert!(out.contains("LAP 1 - P3 - MA\u{FFFD}X"));
        // last line has no trailing newline and is still handled
        assert!(out.contains("LAP 2 - P? - UNKNOWN"));
        assert_eq!(out.matches("FARVIS RACE ENGINEER").count(), 2);
        assert!(!out.contains(SIGN_OFF));
    }

    #[tokio::test]
    async fn test_shutdown_signs_off() {
        let mut engineer = engineer();
        let mut out = Vec::new();
        let input: &[u8] = b"{\"current_lap\":1}\n";

        let end = run(&mut engineer, input, std::future::ready(()), &mut out)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(out.ends_with("\n\nRace Engineer signing off. Good race!\n"));
        assert!(!out.contains("FARVIS RACE ENGINEER"));
    }

    #[tokio::test]
    async fn test_shutdown_while_waiting_for_input() {
        let (_writer, reader) = tokio::io::duplex(64);
        let mut engineer = engineer();
        let mut out = Vec::new();

        let shutdown = tokio::time::sleep(Duration::from_millis(20));
        let end = run(&mut engineer, BufReader::new(reader), shutdown, &mut out)
            .await
            .unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(String::from_utf8(out).unwrap().contains(SIGN_OFF));
    }

    #[tokio::test]
    async fn test_read_error_does_not_end_session() {
        let flaky = Flaky {
            failures: 2,
            data: b"{\"driver_id\":0,\"current_lap\":1}\n",
        };
        let mut engineer = engineer();
        let mut out = Vec::new();

        let end = run(&mut engineer, BufReader::new(flaky), std::future::pending(), &mut out)
            .await
            .unwrap();

        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(String::from_utf8(out).unwrap().contains("LAP 1"));
    }

    #[tokio::test]
    async fn test_dead_input_is_given_up() {
        let dead = Flaky {
            failures: u32::MAX,
            data: b"",
        };
        let mut engineer = engineer();
        let mut out = Vec::new();

        let end = run(&mut engineer, BufReader::new(dead), std::future::pending(), &mut out)
            .await
            .unwrap();
        assert_eq!(end, SessionEnd::InputFailed);
    }
}
