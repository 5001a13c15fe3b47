use embedded_io_async::Read;
use log::debug;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::frame::{read_response, Reply, Response};

/// Reads frames until one is a command reply.
///
/// In active mode the sensor keeps sending data reports, so those are
/// dropped while waiting; each one counts as an attempt. Decode and port
/// errors end the wait immediately. After `max_attempts` frames without a
/// reply this fails with [`Error::NoReply`].
pub async fn await_reply<S: Read>(port: &mut S, max_attempts: usize) -> Result<Reply, S::Error> {
    for attempt in 1..=max_attempts {
        let response = read_response(port).await?;
        match response {
            Response::Reply(reply) => return Ok(reply),
            Response::Measurement(_) => debug!(
                "Received data, but not a reply (attempt {}/{}): {:02X?}",
                attempt,
                max_attempts,
                response.bytes()
            ),
        }
    }
    log::error!("No reply after {} frames", max_attempts);
    Err(Error::NoReply)
}

/// Reads frames until one is a reply to `command`.
///
/// Like [`await_reply`], but replies echoing another command are dropped
/// too, e.g. a reply that arrived after an earlier wait gave up. Every
/// dropped frame counts as an attempt.
pub async fn await_reply_to<S: Read>(
    port: &mut S,
    command: Command,
    max_attempts: usize,
) -> Result<Reply, S::Error> {
    for attempt in 1..=max_attempts {
        let response = read_response(port).await?;
        match response {
            Response::Reply(reply) if reply.answers(command) => return Ok(reply),
            Response::Reply(reply) => log::warn!(
                "Dropping reply to command {:02X} while waiting for {:?} (attempt {}/{})",
                reply.command(),
                command,
                attempt,
                max_attempts
            ),
            Response::Measurement(_) => debug!(
                "Received data, but not a reply (attempt {}/{}): {:02X?}",
                attempt,
                max_attempts,
                response.bytes()
            ),
        }
    }
    log::error!("No reply to {:?} after {} frames", command, max_attempts);
    Err(Error::NoReply)
}
