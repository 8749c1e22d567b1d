//! Cross-context messaging: the controller talks to the agent of the active
//! tab through a [`TabMessenger`].
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ext_logging::{ext_debug, ext_trace};
use highlighter_core::{ActionMessage, AgentResponse, ResponseMode};
use tokio::sync::{mpsc, oneshot};

use crate::agent::{Dispatch, PageAgent};
use crate::asset::AssetLoader;
use crate::clipboard::Clipboard;
use crate::page::PageSurface;
use crate::{TabId, TransportError};

#[async_trait(?Send)]
pub trait TabMessenger {
    async fn active_tab(&self) -> Result<TabId, TransportError>;
    /// Delivers a message without waiting for any reply.
    async fn post(&self, tab: TabId, message: ActionMessage) -> Result<(), TransportError>;
    /// Delivers a message and waits for the reply. `Ok(None)` means the
    /// receiver finished without answering.
    async fn request(
        &self,
        tab: TabId,
        message: ActionMessage,
    ) -> Result<Option<AgentResponse>, TransportError>;
    async fn open_tab(&self, url: &str) -> Result<(), TransportError>;
}

/// A message in flight, with the reply channel when the sender waits.
#[derive(Debug)]
pub struct Envelope {
    pub message: ActionMessage,
    reply: Option<oneshot::Sender<Option<AgentResponse>>>,
}

impl Envelope {
    pub fn respond(self, response: Option<AgentResponse>) {
        if let Some(reply) = self.reply {
            // The sender may have given up; nothing to clean up then.
            let _ = reply.send(response);
        }
    }
}

#[derive(Default)]
struct BusInner {
    tabs: HashMap<TabId, mpsc::UnboundedSender<Envelope>>,
    active: Option<TabId>,
    next_tab: TabId,
    opened: Vec<String>,
}

/// In-process message bus standing in for the browser's extension messaging.
/// Clones share the same set of tabs.
#[derive(Clone, Default)]
pub struct LocalBus {
    inner: Arc<Mutex<BusInner>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BusInner>, TransportError> {
        self.inner
            .lock()
            .map_err(|err| TransportError::Platform(err.to_string()))
    }

    /// Registers a new tab, makes it active and returns its endpoint.
    pub fn attach_tab(&self) -> Result<AgentEndpoint, TransportError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock()?;
        inner.next_tab += 1;
        let tab = inner.next_tab;
        inner.tabs.insert(tab, tx);
        inner.active = Some(tab);
        Ok(AgentEndpoint { tab, rx })
    }

    pub fn activate(&self, tab: TabId) -> Result<(), TransportError> {
        let mut inner = self.lock()?;
        if !inner.tabs.contains_key(&tab) {
            return Err(TransportError::TabClosed(tab));
        }
        inner.active = Some(tab);
        Ok(())
    }

    pub fn close_tab(&self, tab: TabId) -> Result<(), TransportError> {
        let mut inner = self.lock()?;
        inner.tabs.remove(&tab);
        if inner.active == Some(tab) {
            inner.active = None;
        }
        Ok(())
    }

    /// URLs passed to [`TabMessenger::open_tab`], oldest first.
    pub fn opened_urls(&self) -> Vec<String> {
        self.lock()
            .map(|inner| inner.opened.clone())
            .unwrap_or_default()
    }

    fn deliver(&self, tab: TabId, envelope: Envelope) -> Result<(), TransportError> {
        let inner = self.lock()?;
        let sender = inner.tabs.get(&tab).ok_or(TransportError::TabClosed(tab))?;
        sender
            .send(envelope)
            .map_err(|_| TransportError::TabClosed(tab))
    }
}

#[async_trait(?Send)]
impl TabMessenger for LocalBus {
    async fn active_tab(&self) -> Result<TabId, TransportError> {
        self.lock()?.active.ok_or(TransportError::NoActiveTab)
    }

    async fn post(&self, tab: TabId, message: ActionMessage) -> Result<(), TransportError> {
        ext_trace!("post {} to tab {tab}", message.name());
        self.deliver(
            tab,
            Envelope {
                message,
                reply: None,
            },
        )
    }

    async fn request(
        &self,
        tab: TabId,
        message: ActionMessage,
    ) -> Result<Option<AgentResponse>, TransportError> {
        ext_trace!("request {} from tab {tab}", message.name());
        let (reply, response) = oneshot::channel();
        self.deliver(
            tab,
            Envelope {
                message,
                reply: Some(reply),
            },
        )?;
        // A dropped reply sender counts as "no response".
        Ok(response.await.ok().flatten())
    }

    async fn open_tab(&self, url: &str) -> Result<(), TransportError> {
        self.lock()?.opened.push(url.to_string());
        Ok(())
    }
}

/// The receiving end of one tab.
pub struct AgentEndpoint {
    tab: TabId,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl AgentEndpoint {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Serves one message to `agent`. Returns `false` once the bus is gone.
    pub async fn serve_next<P, C, A>(&mut self, agent: &mut PageAgent<P, C, A>) -> bool
    where
        P: PageSurface,
        C: Clipboard,
        A: AssetLoader + 'static,
    {
        let Some(envelope) = self.rx.recv().await else {
            return false;
        };
        match agent.dispatch(envelope.message.clone()) {
            Dispatch::Immediate(response) => envelope.respond(response),
            Dispatch::Deferred(pending) => {
                debug_assert_eq!(envelope.message.response_mode(), ResponseMode::Deferred);
                ext_debug!("tab {} keeps the reply channel open", self.tab);
                let loaded = pending.loaded().await;
                envelope.respond(agent.complete_copy(loaded));
            }
        }
        true
    }

    /// Serves messages until the tab is closed on the bus.
    pub async fn serve<P, C, A>(&mut self, agent: &mut PageAgent<P, C, A>)
    where
        P: PageSurface,
        C: Clipboard,
        A: AssetLoader + 'static,
    {
        while self.serve_next(agent).await {}
    }
}
