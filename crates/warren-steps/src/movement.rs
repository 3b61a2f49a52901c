//! Movement: resolve every creep's move order for the tick.
//!
//! Runs first so every later step that cares about position (combat
//! foremost) sees post-move positions through the ledger. Tile
//! conflicts are resolved deterministically: the first claimant in
//! envelope order wins, later claimants stay put. An occupied tile
//! only opens once its occupant has actually moved out, so a mover
//! whose own move fails keeps blocking its tile; mutual swaps trade
//! tiles atomically.

use crate::context::StepContext;
use crate::step::RoomStep;
use indexmap::{IndexMap, IndexSet};
use warren_core::{active_parts, BodyPartKind, ObjectId, RoomPosition, StepFault};
use warren_model::{ObjectKind, RoomObjectSnapshot, RoomSnapshot};
use warren_mutation::ObjectPatch;

/// Resolves creep movement orders.
pub struct MovementStep;

fn can_move(creep: &RoomObjectSnapshot) -> bool {
    let movable_kind = matches!(creep.kind, ObjectKind::Creep | ObjectKind::PowerCreep);
    if !movable_kind || !creep.is_alive() || creep.spawning {
        return false;
    }
    creep.kind == ObjectKind::PowerCreep || active_parts(&creep.body, BodyPartKind::Move) > 0
}

fn tile_blocked(
    snapshot: &RoomSnapshot,
    mover: &RoomObjectSnapshot,
    target: RoomPosition,
    vacated: &IndexSet<ObjectId>,
    also_vacating: Option<&ObjectId>,
) -> bool {
    for obj in snapshot.objects_at(target) {
        match obj.kind {
            ObjectKind::Creep | ObjectKind::PowerCreep => {
                // The tile only opens once its occupant has really left.
                if !vacated.contains(&obj.id) && Some(&obj.id) != also_vacating {
                    return true;
                }
            }
            ObjectKind::Rampart => {
                let foreign = obj.user.is_some() && obj.user != mover.user;
                if foreign && obj.is_public != Some(true) {
                    return true;
                }
            }
            kind if !kind.is_walkable() => return true,
            _ => {}
        }
    }
    false
}

fn commit_move(
    ctx: &mut StepContext<'_>,
    moved: &mut IndexSet<ObjectId>,
    claims: &mut IndexSet<RoomPosition>,
    id: ObjectId,
    target: RoomPosition,
) {
    ctx.ledger.record_position(&id, target);
    ctx.writer.patch(
        id.clone(),
        ObjectPatch {
            pos: Some(target),
            ..Default::default()
        },
    );
    claims.insert(target);
    moved.insert(id);
}

impl RoomStep for MovementStep {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let terrain = ctx.snapshot.terrain().map_err(|e| StepFault::ExecutionFailed {
            reason: format!("terrain undecodable: {e}"),
        })?;

        let snapshot = ctx.snapshot;

        // Valid move requests in envelope order.
        let mut pending: IndexMap<ObjectId, RoomPosition> = IndexMap::new();
        for envelope in &snapshot.intents {
            for (id, command) in &envelope.moves {
                let Some(creep) = snapshot.object(id) else {
                    continue;
                };
                if envelope.user.is_some() && creep.user != envelope.user {
                    continue;
                }
                if !can_move(creep) {
                    continue;
                }
                let Some(target) = creep.pos.step(command.direction) else {
                    continue; // border crossings belong to the global pass
                };
                if terrain.is_wall(target) {
                    continue;
                }
                pending.insert(id.clone(), target);
            }
        }

        let mut moved: IndexSet<ObjectId> = IndexSet::new();
        let mut claims: IndexSet<RoomPosition> = IndexSet::new();

        // Mutual swaps first: both tiles change hands at once, so
        // neither creep waits on the other's vacancy.
        let requesters: Vec<ObjectId> = pending.keys().cloned().collect();
        for id in &requesters {
            if moved.contains(id) {
                continue;
            }
            let Some(&target) = pending.get(id) else {
                continue;
            };
            let Some(creep) = snapshot.object(id) else {
                continue;
            };
            let partner = snapshot.objects_at(target).find(|o| {
                matches!(o.kind, ObjectKind::Creep | ObjectKind::PowerCreep)
                    && !moved.contains(&o.id)
                    && pending.get(&o.id) == Some(&creep.pos)
            });
            let Some(partner) = partner else {
                continue;
            };
            if claims.contains(&target) || claims.contains(&creep.pos) {
                continue;
            }
            if tile_blocked(snapshot, creep, target, &moved, Some(&partner.id))
                || tile_blocked(snapshot, partner, creep.pos, &moved, Some(id))
            {
                continue;
            }
            let partner_id = partner.id.clone();
            let back = creep.pos;
            commit_move(ctx, &mut moved, &mut claims, id.clone(), target);
            commit_move(ctx, &mut moved, &mut claims, partner_id, back);
        }
        pending.retain(|id, _| !moved.contains(id));

        // Everyone else: deferred movers are retried until a pass makes
        // no progress, so a tile counts as vacated only once its
        // occupant's own move has succeeded. The first claimant in
        // envelope order keeps a contested tile.
        loop {
            let mut progressed = false;
            let round: Vec<ObjectId> = pending.keys().cloned().collect();
            for id in round {
                let Some(&target) = pending.get(&id) else {
                    continue;
                };
                let Some(creep) = snapshot.object(&id) else {
                    pending.shift_remove(&id);
                    continue;
                };
                if claims.contains(&target) {
                    // claimed tiles never reopen this tick
                    pending.shift_remove(&id);
                    continue;
                }
                if tile_blocked(snapshot, creep, target, &moved, None) {
                    continue;
                }
                commit_move(ctx, &mut moved, &mut claims, id.clone(), target);
                pending.shift_remove(&id);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
        Ok(())
    }
}
