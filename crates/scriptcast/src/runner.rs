//! Drives a scripted recording session.
//!
//! The runner spawns `asciinema rec` on a PTY, types the script's actions
//! with randomized per-character delays, and notes wall-clock-relative
//! timestamps for marker and comment actions. Once the recorder exits, the
//! captured cast is loaded, the noted events are merged in, the script's
//! filter chain runs, and the result is written back over the output file.

use std::io::{Read, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use rand::Rng;

use crate::cast::{AsciiCast, Event};
use crate::error::{Result, ScriptcastError};
use crate::filter::FilterChain;
use crate::script::{Action, DelayRange, Script, TypedAction};

/// Fraction of the last newline delay that marker and comment timestamps
/// are shifted back by, so they land before the next line begins.
const EVENT_BACKDATE: f64 = 0.8;

/// Runs scripts against a live `asciinema` recorder.
#[derive(Debug, Clone, Default)]
pub struct ScriptRunner {
    quiet: bool,
}

impl ScriptRunner {
    /// Create a runner with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the per-line console progress indicator.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Record the script and post-process the resulting cast file.
    pub fn run(&self, script: &Script) -> Result<()> {
        let mut rng = rand::rng();

        // GNU screen provides the status line that comment actions write
        // to; its configuration lives in a throwaway rc file.
        let screenrc = if script.with_comments {
            let mut file = tempfile::NamedTempFile::new()
                .map_err(|e| ScriptcastError::io_context("creating screenrc", e))?;
            file.write_all(screenrc_contents(script.comments_at_top).as_bytes())
                .map_err(|e| ScriptcastError::io_context("writing screenrc", e))?;
            Some(file)
        } else {
            None
        };

        let args = recorder_args(script, screenrc.as_ref().map(tempfile::NamedTempFile::path));
        tracing::info!(output = %script.output_file.display(), "starting recorder");

        let pty = native_pty_system()
            .openpty(PtySize {
                rows: script.rows.unwrap_or(24),
                cols: script.cols.unwrap_or(80),
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ScriptcastError::session(format!("opening pty: {e}")))?;

        let mut cmd = CommandBuilder::new("asciinema");
        cmd.args(&args);
        let mut child = pty
            .slave
            .spawn_command(cmd)
            .map_err(|e| ScriptcastError::session(format!("spawning asciinema: {e}")))?;
        drop(pty.slave);

        // Drain recorder output on a detached thread so the child never
        // blocks on a full PTY buffer.
        let mut reader = pty
            .master
            .try_clone_reader()
            .map_err(|e| ScriptcastError::session(format!("cloning pty reader: {e}")))?;
        thread::spawn(move || {
            let mut sink = [0u8; 4096];
            while matches!(reader.read(&mut sink), Ok(n) if n > 0) {}
        });

        let mut writer = pty
            .master
            .take_writer()
            .map_err(|e| ScriptcastError::session(format!("taking pty writer: {e}")))?;

        let started = Instant::now();
        sleep_secs(script.start_delay);

        let mut pending = Vec::new();
        let mut newline_delay = 0.0_f64;

        for action in &script.actions {
            let (content, pre_nl, post_nl) = match action {
                Action::Line(text) => (text.as_str(), script.pre_nl_delay, script.post_nl_delay),
                Action::Typed(TypedAction::Input {
                    text,
                    pre_nl_delay,
                    post_nl_delay,
                }) => (
                    text.as_str(),
                    DelayRange::fixed(*pre_nl_delay),
                    DelayRange::fixed(*post_nl_delay),
                ),
                Action::Typed(TypedAction::Marker { label }) => {
                    let time = event_time(started.elapsed(), newline_delay);
                    tracing::debug!(label = %label, time, "observed marker");
                    pending.push(Event::marker(time, label.clone()));
                    continue;
                }
                Action::Typed(TypedAction::Comment { comment }) => {
                    let time = event_time(started.elapsed(), newline_delay);
                    tracing::debug!(comment = %comment, time, "observed comment");
                    pending.push(Event::comment(time, script.comments_at_top, comment.clone()));
                    continue;
                }
            };

            newline_delay = send_line(
                &mut writer,
                content,
                &mut rng,
                script.typing_delay,
                pre_nl,
                post_nl,
            )?;
            if !self.quiet {
                print!(".");
                let _ = std::io::stdout().flush();
            }
        }

        sleep_secs(script.end_delay);

        // Closing the PTY hangs up the recorder if the session has not
        // already exited on its own.
        drop(writer);
        drop(pty.master);
        let status = child
            .wait()
            .map_err(|e| ScriptcastError::io_context("waiting for recorder", e))?;
        if !self.quiet {
            println!();
        }
        tracing::info!(success = status.success(), "recorder finished");

        post_process(script, pending)
    }
}

/// Run the post-recording pipeline: load, merge, filter, save.
pub fn post_process(script: &Script, observed: Vec<Event>) -> Result<()> {
    let cast = AsciiCast::load(&script.output_file)?;
    let cast = cast.insert_events(observed)?;
    let chain = FilterChain::from_specs(&script.filters)?;
    let cast = chain.apply(cast);
    cast.save(&script.output_file)
}

/// Type one line: each character with a sampled typing delay, then the
/// newline wrapped in its own delays. Returns the sampled newline delay.
fn send_line<W, R>(
    writer: &mut W,
    content: &str,
    rng: &mut R,
    typing_delay: DelayRange,
    pre_nl_delay: DelayRange,
    post_nl_delay: DelayRange,
) -> Result<f64>
where
    W: Write + ?Sized,
    R: Rng,
{
    let mut buf = [0u8; 4];
    for ch in content.chars() {
        writer
            .write_all(ch.encode_utf8(&mut buf).as_bytes())
            .map_err(|e| ScriptcastError::io_context("sending keystroke", e))?;
        writer
            .flush()
            .map_err(|e| ScriptcastError::io_context("flushing keystroke", e))?;
        sleep_secs(typing_delay.sample(rng));
    }
    sleep_secs(pre_nl_delay.sample(rng));
    writer
        .write_all(b"\n")
        .map_err(|e| ScriptcastError::io_context("sending newline", e))?;
    writer
        .flush()
        .map_err(|e| ScriptcastError::io_context("flushing newline", e))?;
    let final_delay = post_nl_delay.sample(rng);
    sleep_secs(final_delay);
    Ok(final_delay)
}

/// Arguments for `asciinema`, in invocation order.
fn recorder_args(script: &Script, screenrc: Option<&Path>) -> Vec<String> {
    let mut args = vec!["rec".to_string()];
    if let Some(rc) = screenrc {
        args.push("-c".to_string());
        args.push(format!("screen -c \"{}\"", rc.display()));
    }
    args.push("--overwrite".to_string());
    if let Some(cols) = script.cols {
        args.push("--cols".to_string());
        args.push(cols.to_string());
    }
    if let Some(rows) = script.rows {
        args.push("--rows".to_string());
        args.push(rows.to_string());
    }
    args.push(script.output_file.display().to_string());
    args
}

/// Contents of the generated screenrc: a blank one-line hardstatus bar at
/// the requested edge.
fn screenrc_contents(at_top: bool) -> String {
    let placement = if at_top { "first" } else { "last" };
    format!("hardstatus always{placement}line\nhardstatus string \" \"\naltscreen on\n")
}

/// Timestamp for an observed marker/comment, shifted back so it lands
/// before the next line begins, rounded to milliseconds.
fn event_time(elapsed: Duration, newline_delay: f64) -> f64 {
    let time = elapsed.as_secs_f64() - EVENT_BACKDATE * newline_delay;
    (time * 1000.0).round() / 1000.0
}

fn sleep_secs(seconds: f64) {
    if seconds > 0.0 {
        thread::sleep(Duration::from_secs_f64(seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::Header;
    use crate::filter::FilterSpec;

    #[test]
    fn recorder_args_minimal() {
        let script = Script::new("demo.cast");
        assert_eq!(
            recorder_args(&script, None),
            vec!["rec", "--overwrite", "demo.cast"]
        );
    }

    #[test]
    fn recorder_args_with_geometry_and_screen() {
        let script = Script::new("demo.cast").with_geometry(100, 30);
        let args = recorder_args(&script, Some(Path::new("/tmp/rc")));
        assert_eq!(
            args,
            vec![
                "rec",
                "-c",
                "screen -c \"/tmp/rc\"",
                "--overwrite",
                "--cols",
                "100",
                "--rows",
                "30",
                "demo.cast",
            ]
        );
    }

    #[test]
    fn screenrc_placement() {
        let top = screenrc_contents(true);
        assert!(top.contains("hardstatus alwaysfirstline"));
        let bottom = screenrc_contents(false);
        assert!(bottom.contains("hardstatus alwayslastline"));
        assert!(bottom.contains("altscreen on"));
    }

    #[test]
    fn event_time_backdates_and_rounds() {
        let time = event_time(Duration::from_secs_f64(5.4321), 1.0);
        assert_eq!(time, 4.632);

        let time = event_time(Duration::from_secs_f64(0.5), 0.0);
        assert_eq!(time, 0.5);
    }

    #[test]
    fn send_line_returns_sampled_newline_delay() {
        let mut sink = Vec::new();
        let mut rng = rand::rng();
        let delay = send_line(
            &mut sink,
            "ls",
            &mut rng,
            DelayRange::fixed(0.0),
            DelayRange::fixed(0.0),
            DelayRange(0.0, 0.0),
        )
        .unwrap();
        assert_eq!(delay, 0.0);
        assert_eq!(sink, b"ls\n");
    }

    #[test]
    fn post_process_pipeline_over_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.cast");
        AsciiCast::with_events(
            Header::new(80, 24),
            vec![
                Event::output(0.5, "before\r\n"),
                Event::output(2.0, "after\r\n"),
            ],
        )
        .save(&path)
        .unwrap();

        let script = Script::new(&path)
            .with_filters(vec![FilterSpec::EndMarkerFilter {
                end_label: "CUT".to_string(),
            }])
            .with_comments_enabled(false);

        let observed = vec![
            Event::comment(0.25, false, "hello"),
            Event::marker(1.0, "CUT"),
        ];
        post_process(&script, observed).unwrap();

        let cast = AsciiCast::load(&path).unwrap();
        assert_eq!(cast.events.len(), 2);
        let Event::Output { data, time } = &cast.events[0] else {
            panic!("expected output event");
        };
        assert_eq!(*time, 0.25);
        assert!(data.contains("hello"));
        assert_eq!(cast.events[1], Event::output(0.5, "before\r\n"));
    }
}
