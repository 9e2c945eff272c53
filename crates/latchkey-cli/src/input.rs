//! Operator input from stdin.
//!
//! One command per line:
//!
//! ```text
//! AA:BB:CC:DD       tap a tag (same as `tap AA:BB:CC:DD`)
//! present AABBCCDD  leave a tag on the reader
//! remove            take it off again
//! hold              press the wipe button
//! release           release it
//! ```
//!
//! Blank lines and `#` comments are ignored.

use latchkey_core::Uid;
use latchkey_hardware::mock::{MockButtonHandle, MockReaderHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tap(Uid),
    Present(Uid),
    Remove,
    Hold,
    Release,
}

/// Parse one input line; `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> latchkey_core::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word.to_ascii_lowercase().as_str() {
        "tap" => Command::Tap(rest.parse()?),
        "present" => Command::Present(rest.parse()?),
        "remove" => Command::Remove,
        "hold" => Command::Hold,
        "release" => Command::Release,
        _ => Command::Tap(line.parse()?),
    };
    Ok(Some(command))
}

/// Feed commands from `input` to the mock reader and button until EOF.
pub async fn drive<I>(
    input: I,
    tags: &MockReaderHandle,
    button: &MockButtonHandle,
) -> anyhow::Result<()>
where
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!("Ignoring input {:?}: {}", line, err);
                continue;
            }
        };

        debug!("Input: {:?}", command);
        match command {
            Command::Tap(uid) => tags.tap(uid).await?,
            Command::Present(uid) => tags.present(uid).await?,
            Command::Remove => tags.remove().await?,
            Command::Hold => button.press(),
            Command::Release => button.release(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hardware::mock::{MockButton, MockReader};
    use latchkey_hardware::{TagReader, WipeButton};
    use rstest::rstest;

    fn uid(text: &str) -> Uid {
        text.parse().unwrap()
    }

    #[rstest]
    #[case("AA:BB:CC:DD", Command::Tap(uid("AA:BB:CC:DD")))]
    #[case("  tap aabbccdd ", Command::Tap(uid("AA:BB:CC:DD")))]
    #[case("present 01-02-03-04", Command::Present(uid("01:02:03:04")))]
    #[case("remove", Command::Remove)]
    #[case("HOLD", Command::Hold)]
    #[case("release", Command::Release)]
    fn test_parse_command(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse_command(line).unwrap(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("# admin card")]
    fn test_parse_ignored(#[case] line: &str) {
        assert_eq!(parse_command(line).unwrap(), None);
    }

    #[rstest]
    #[case("tap")]
    #[case("open sesame")]
    #[case("AA:BB")]
    fn test_parse_invalid(#[case] line: &str) {
        assert!(parse_command(line).is_err());
    }

    #[tokio::test]
    async fn test_drive_feeds_devices() {
        let (mut reader, tags) = MockReader::new();
        let (mut button, button_handle) = MockButton::new();
        let script: &[u8] = b"# test\nAA:BB:CC:DD\nbogus\nhold\n";

        drive(script, &tags, &button_handle).await.unwrap();

        assert_eq!(reader.try_read_uid().await.unwrap(), Some(uid("AA:BB:CC:DD")));
        assert!(button.is_held().await.unwrap());
    }
}
