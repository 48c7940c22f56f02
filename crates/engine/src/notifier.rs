// SPDX-License-Identifier: MIT

//! An ambient extension point for observing lifecycle transitions
//! side-channel, without giving the observer a hand in any decision. The
//! daemon itself never needs more than [`NoopNotifier`]; this exists for
//! embedders (tests, a future overlay) that want to react to transitions
//! without subscribing to every output bus.

use expedition_core::{Expedition, ExpeditionId};

pub trait ExpeditionNotifier: Send + Sync {
    fn expedition_started(&self, _expedition: &Expedition) {}
    fn expedition_completed(&self, _expedition: &Expedition) {}
    fn expedition_ended(&self, _expedition: &Expedition) {}
    fn expedition_deleted(&self, _id: ExpeditionId) {}
}

pub struct NoopNotifier;

impl ExpeditionNotifier for NoopNotifier {}
