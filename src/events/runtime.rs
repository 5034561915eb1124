//! Native event loop.
//!
//! Confines the controller to a single task: every event arrives over one
//! channel and is handled to completion before the next is received. Resize
//! events are debounced with tokio timers; a newer resize replaces the
//! pending deadline.

use super::debounce::Debouncer;
use super::input::{Handler, InputEvent};
use crate::controller::Controller;
use crate::host::HostBridge;
use crate::ui::Presenter;
use log::*;
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};

/// Specify different runtime event types.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Resize(u32),
}

pub type EventSender = mpsc::UnboundedSender<Event>;
type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Owns the controller and drives it from the event channel.
///
pub struct EventLoop<H: HostBridge, P: Presenter> {
    controller: Controller<H, P>,
    handler: Handler,
    resize: Debouncer<u32>,
    receiver: EventReceiver,
    origin: Instant,
}

impl<H: HostBridge, P: Presenter> EventLoop<H, P> {
    /// Return a new loop and the sender feeding it.
    ///
    pub fn new(controller: Controller<H, P>) -> (Self, EventSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = Handler::new(controller.config().keys.clone());
        let resize = Debouncer::new(controller.config().resize_debounce_ms);
        let event_loop = EventLoop {
            controller,
            handler,
            resize,
            receiver: rx,
            origin: Instant::now(),
        };
        (event_loop, tx)
    }

    /// Process events until every sender is dropped, then return the
    /// controller. A resize still pending at that point is applied first.
    ///
    pub async fn run(mut self) -> Controller<H, P> {
        debug!("Starting navigation event loop...");
        loop {
            let deadline = self.resize.deadline().map(|ms| self.instant_at(ms));
            tokio::select! {
                event = self.receiver.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.settle();
                }
            }
        }
        if let Some(width) = self.resize.fire(u64::MAX) {
            self.controller.viewport_settled(width);
        }
        debug!("Navigation event loop stopped.");
        self.controller
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::Input(input) => {
                self.handler.handle(&mut self.controller, input);
            }
            Event::Resize(width) => {
                self.controller.set_viewport_width(width);
                let now = self.now_ms();
                self.resize.schedule(now, width);
            }
        }
    }

    fn settle(&mut self) {
        if let Some(width) = self.resize.fire(self.now_ms()) {
            debug!("Viewport settled at {}px", width);
            self.controller.viewport_settled(width);
        }
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn instant_at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}
