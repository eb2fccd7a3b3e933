//! SSH session to a deployment target
//!
//! One authenticated connection per workflow invocation: command execution
//! over exec channels, artifact upload over the SFTP subsystem, explicit
//! idempotent close. A session is not safe for concurrent use; the agent
//! runs at most one command at a time per session.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client;
use russh::{ChannelMsg, Disconnect};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::domain::remote::{CommandResult, RemoteTarget};
use crate::error::AgentError;

/// Command execution and file transfer on a remote host.
///
/// `SshSession` is the production implementation; service-level tests
/// substitute a scripted fake.
#[async_trait]
pub trait RemoteHost: Send {
    /// Runs one command line to completion, capturing exit code and both
    /// output streams. No timeout at this layer; callers bound their own
    /// waits where they need to.
    async fn execute(&mut self, command: &str) -> Result<CommandResult, AgentError>;

    /// Copies a local file to an absolute remote path, overwriting any
    /// existing file. The destination directory must already exist and be
    /// writable by the connected user.
    async fn transfer(&mut self, local_path: &Path, remote_path: &str) -> Result<(), AgentError>;
}

struct ClientHandler;

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh_keys::key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Targets are hosts this agent provisions; accept their keys.
        Ok(true)
    }
}

/// One authenticated SSH connection.
pub struct SshSession {
    target: RemoteTarget,
    handle: Option<client::Handle<ClientHandler>>,
}

impl SshSession {
    /// Connects and authenticates with the target's private key.
    ///
    /// Never retries internally; any transport or authentication failure
    /// surfaces as `AgentError::Connect` carrying the underlying cause.
    pub async fn open(target: &RemoteTarget) -> Result<Self, AgentError> {
        info!(host = %target.host, user = %target.username, "Connecting");

        let config = Arc::new(client::Config::default());
        let mut handle = client::connect(config, (target.host.as_str(), 22), ClientHandler)
            .await
            .map_err(|e| AgentError::Connect(e.to_string()))?;

        let key = russh_keys::load_secret_key(&target.key_path, None).map_err(|e| {
            AgentError::Connect(format!("cannot load key {}: {}", target.key_path, e))
        })?;

        let authenticated = handle
            .authenticate_publickey(&target.username, Arc::new(key))
            .await
            .map_err(|e| AgentError::Connect(e.to_string()))?;
        if !authenticated {
            return Err(AgentError::Connect(format!(
                "public key rejected for user {}",
                target.username
            )));
        }

        Ok(Self {
            target: target.clone(),
            handle: Some(handle),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the transport.
    ///
    /// Idempotent: closing an already-closed session is a no-op. Dropping
    /// the session also tears the connection down, so early-return paths
    /// cannot leak it; workflows still close explicitly so the disconnect
    /// is graceful.
    pub async fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.disconnect(Disconnect::ByApplication, "", "en").await {
                debug!(error = %e, "Disconnect raced with transport teardown");
            }
            info!(host = %self.target.host, "Session closed");
        }
    }

    fn handle_mut(&mut self) -> Result<&mut client::Handle<ClientHandler>, AgentError> {
        self.handle.as_mut().ok_or(AgentError::NotConnected)
    }
}

#[async_trait]
impl RemoteHost for SshSession {
    async fn execute(&mut self, command: &str) -> Result<CommandResult, AgentError> {
        let handle = self.handle_mut()?;

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
                _ => {}
            }
        }

        // A channel that closed without reporting a status did not finish
        // normally; treat it as a failure rather than guessing success.
        let exit_code = exit_code.unwrap_or(255);

        Ok(CommandResult::new(
            exit_code,
            &String::from_utf8_lossy(&stdout),
            &String::from_utf8_lossy(&stderr),
        ))
    }

    async fn transfer(&mut self, local_path: &Path, remote_path: &str) -> Result<(), AgentError> {
        let handle = self.handle_mut()?;

        let data = tokio::fs::read(local_path).await.map_err(|e| {
            AgentError::Transfer(format!("cannot read {}: {}", local_path.display(), e))
        })?;

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| AgentError::Transfer(e.to_string()))?;
        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| AgentError::Transfer(e.to_string()))?;

        let sftp = russh_sftp::client::SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| AgentError::Transfer(e.to_string()))?;

        let mut remote_file = sftp
            .create(remote_path)
            .await
            .map_err(|e| AgentError::Transfer(format!("cannot create {remote_path}: {e}")))?;
        remote_file
            .write_all(&data)
            .await
            .map_err(|e| AgentError::Transfer(e.to_string()))?;
        remote_file
            .shutdown()
            .await
            .map_err(|e| AgentError::Transfer(e.to_string()))?;

        let _ = sftp.close().await;

        info!(bytes = data.len(), remote = %remote_path, "File uploaded");
        Ok(())
    }
}
