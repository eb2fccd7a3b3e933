//! Scripted fake remote host for service-level tests

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::remote::CommandResult;
use crate::error::AgentError;
use crate::infra::ssh::RemoteHost;

struct Rule {
    pattern: String,
    replies: VecDeque<CommandResult>,
}

/// Fake `RemoteHost` driven by substring-matched canned replies.
///
/// Commands are matched against rules in insertion order; a rule with
/// several replies hands them out one per call and then keeps repeating the
/// last one. Unmatched commands succeed with empty output. Every command
/// line and transfer is recorded for assertions.
pub struct ScriptedHost {
    rules: Vec<Rule>,
    pub commands: Vec<String>,
    pub transfers: Vec<(PathBuf, String)>,
    fail_transfer: bool,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            commands: Vec::new(),
            transfers: Vec::new(),
            fail_transfer: false,
        }
    }

    /// Registers one canned reply for commands containing `pattern`.
    pub fn on(mut self, pattern: &str, reply: CommandResult) -> Self {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.pattern == pattern) {
            rule.replies.push_back(reply);
        } else {
            self.rules.push(Rule {
                pattern: pattern.to_string(),
                replies: VecDeque::from([reply]),
            });
        }
        self
    }

    /// Makes every subsequent transfer fail.
    pub fn with_failing_transfer(mut self) -> Self {
        self.fail_transfer = true;
        self
    }

    /// Number of recorded command lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.commands.iter().filter(|c| c.contains(needle)).count()
    }
}

/// Successful reply with the given stdout.
pub fn ok(stdout: &str) -> CommandResult {
    CommandResult::new(0, stdout, "")
}

/// Failed reply with the given exit code and stderr.
pub fn failed(code: u32, stderr: &str) -> CommandResult {
    CommandResult::new(code, "", stderr)
}

#[async_trait]
impl RemoteHost for ScriptedHost {
    async fn execute(&mut self, command: &str) -> Result<CommandResult, AgentError> {
        self.commands.push(command.to_string());

        for rule in &mut self.rules {
            if command.contains(&rule.pattern) {
                let reply = if rule.replies.len() > 1 {
                    rule.replies.pop_front()
                } else {
                    rule.replies.front().cloned()
                };
                if let Some(reply) = reply {
                    return Ok(reply);
                }
            }
        }
        Ok(ok(""))
    }

    async fn transfer(&mut self, local_path: &Path, remote_path: &str) -> Result<(), AgentError> {
        self.transfers
            .push((local_path.to_path_buf(), remote_path.to_string()));
        if self.fail_transfer {
            return Err(AgentError::Transfer(format!(
                "refused upload to {remote_path}"
            )));
        }
        Ok(())
    }
}
