use super::data::LogMessage;

/// Messages that can be sent to the Log actor.
#[derive(Debug)]
pub enum Message {
    /// Appends a message to the log files
    Log(LogMessage),
    /// Prints buffered messages to stderr and stops the actor
    Flush,
    /// Deletes log files older than the configured maximum age
    CollectGarbage,
}
