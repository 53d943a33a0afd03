//! Lifecycle manager for the single widget instance a host page may carry.
//!
//! States are `Idle` and `Mounted`. `init` from `Mounted` tears the live
//! instance down completely before building the next one; `destroy` from
//! `Idle` does nothing.

use crate::component::{ChatComponent, MountError};
use crate::dom::{DomError, HostDocument};
use crate::style::RESET_CSS;
use crate::widget::{CONTAINER_ID, ConfigError, WidgetConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("invalid widget config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Mount(#[from] MountError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Mounted,
}

struct WidgetInstance<Container, Handle> {
    container: Container,
    handle: Handle,
    config: WidgetConfig,
}

pub struct WidgetLoader<D, C>
where
    D: HostDocument,
    C: ChatComponent<D::Boundary>,
{
    document: D,
    component: C,
    instance: Option<WidgetInstance<D::Container, C::Handle>>,
}

impl<D, C> WidgetLoader<D, C>
where
    D: HostDocument,
    C: ChatComponent<D::Boundary>,
{
    pub fn new(document: D, component: C) -> Self {
        Self {
            document,
            component,
            instance: None,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn state(&self) -> LoaderState {
        if self.instance.is_some() {
            LoaderState::Mounted
        } else {
            LoaderState::Idle
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    /// Config of the live instance.
    pub fn config(&self) -> Option<&WidgetConfig> {
        self.instance.as_ref().map(|i| &i.config)
    }

    pub fn container(&self) -> Option<&D::Container> {
        self.instance.as_ref().map(|i| &i.container)
    }

    /// Mount a fresh widget instance, replacing any live one.
    ///
    /// An invalid config is rejected before anything is torn down, so the live
    /// instance (if any) survives. A failure after the container was created
    /// removes it again; the loader is then `Idle`.
    pub fn init(&mut self, config: WidgetConfig) -> Result<(), LoaderError> {
        if let Err(err) = config.validate() {
            warn!(%err, "chat widget init rejected");
            return Err(err.into());
        }
        if let Some(element_id) = &config.element_id {
            debug!(%element_id, "elementId is reserved; mounting into own container");
        }

        self.destroy();

        let container = self
            .document
            .create_container(CONTAINER_ID, &config.bot_id)?;
        match self.build(&container, &config) {
            Ok(handle) => {
                info!(bot_id = %config.bot_id, "chat widget initialized");
                self.instance = Some(WidgetInstance {
                    container,
                    handle,
                    config,
                });
                Ok(())
            }
            Err(err) => {
                self.document.remove_container(&container);
                warn!(bot_id = %config.bot_id, %err, "chat widget init failed");
                Err(err)
            }
        }
    }

    fn build(
        &mut self,
        container: &D::Container,
        config: &WidgetConfig,
    ) -> Result<C::Handle, LoaderError> {
        let boundary = self.document.attach_boundary(container)?;
        self.document.inject_style(&boundary, RESET_CSS)?;
        Ok(self.component.mount(&boundary, config)?)
    }

    /// Tear down the live instance, if any. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        let Some(instance) = self.instance.take() else {
            return;
        };
        self.component.unmount(instance.handle);
        self.document.remove_container(&instance.container);
        debug!(bot_id = %instance.config.bot_id, "chat widget destroyed");
    }
}
