//! Background service worker: keyboard command handling.
//!
//! The worker script registers `commands.onCommand` synchronously and hands
//! each command to [`handle`] once the module has started.
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use anyhow::anyhow;
use ext_logging::{ext_info, ext_warn};
use highlighter_engine::Controller;

use super::chrome::{ChromeStorage, ChromeTabs};
use crate::bundled_config;

type BackgroundController = Controller<ChromeStorage, ChromeTabs>;

thread_local! {
    static CONTROLLER: OnceCell<Rc<RefCell<BackgroundController>>> = const { OnceCell::new() };
}

pub fn start() -> anyhow::Result<()> {
    let config = bundled_config()?;
    let controller = Controller::background(
        config.controller_options(),
        ChromeStorage,
        ChromeTabs,
        &config.settings_key,
    );
    let installed = CONTROLLER.with(|cell| cell.set(Rc::new(RefCell::new(controller))).is_ok());
    if !installed {
        ext_warn!("background already started");
    }
    ext_info!("background ready");
    Ok(())
}

// The worker script chains commands, so only one runs at a time.
#[allow(clippy::await_holding_refcell_ref)]
pub async fn handle(command: String) -> anyhow::Result<()> {
    let controller = CONTROLLER
        .with(|cell| cell.get().cloned())
        .ok_or_else(|| anyhow!("command {command} arrived before the background started"))?;
    let mut controller = controller
        .try_borrow_mut()
        .map_err(|_| anyhow!("command {command} overlaps a running command"))?;
    controller.on_command(&command).await;
    Ok(())
}
