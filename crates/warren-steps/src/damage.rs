//! Hit-point settlement shared by the damage-dealing steps.

use crate::context::StepContext;
use indexmap::IndexSet;
use warren_core::ObjectId;
use warren_model::ObjectKind;
use warren_mutation::{EventKind, ObjectPatch, RoomEvent};

/// Patch the hit points of every object a step touched, from the
/// ledger's accumulated deltas.
///
/// Destroyed structures are removed immediately (nothing later in the
/// pipeline owns structure death); creeps at zero are left for the
/// lifecycle step, which also drops their cargo.
pub(crate) fn settle_hits(ctx: &mut StepContext<'_>, touched: &IndexSet<ObjectId>) {
    for id in touched {
        let Some(obj) = ctx.snapshot.object(id) else {
            continue;
        };
        let Some(effective) = ctx.ledger.effective_hits(obj) else {
            continue;
        };
        let is_creep = matches!(obj.kind, ObjectKind::Creep | ObjectKind::PowerCreep);
        if effective == 0 && !is_creep {
            ctx.writer.remove(id.clone());
            ctx.events.push(RoomEvent {
                kind: EventKind::ObjectDestroyed,
                object: id.clone(),
                target: None,
                amount: None,
                resource: None,
            });
        } else {
            ctx.writer.patch(
                id.clone(),
                ObjectPatch {
                    hits: Some(effective),
                    ..Default::default()
                },
            );
        }
    }
}
