// SPDX-License-Identifier: MIT

use expedition_core::{BakeError, ExpeditionId, LinkId, RouteId};
use expedition_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("expedition {0} is not editable in its current state")]
    NotEditable(ExpeditionId),
    #[error("expedition needs at least one route and a start position before it can be started")]
    NotReadyToStart,
    #[error("there is no active expedition to complete")]
    NoActiveExpedition,
    #[error("the link index is out of bounds for route {0}")]
    LinkIndexOutOfBounds(RouteId),
    #[error("the 'from' and 'to' systems of a link are not the same")]
    LinkSystemMismatch,
    #[error("route {0} already has an outgoing link")]
    DuplicateOutgoingLink(RouteId),
    #[error("route {0} is not attached to this expedition")]
    RouteNotAttached(RouteId),
    #[error("link {0} not found on this expedition")]
    LinkNotFound(LinkId),
    #[error(transparent)]
    Bake(#[from] BakeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
