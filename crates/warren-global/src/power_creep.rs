//! Power-creep account management: create, delete, rename, spawn,
//! upgrade.

use crate::step::{GlobalContext, GlobalStep};
use warren_core::{
    GameTime, ObjectId, StepFault, POWER_CREEP_LIFE_TIME, POWER_CREEP_MAX_LEVEL,
};
use warren_model::{
    ObjectKind, PowerCreepState, PowerKind, PowerLevel, RoomObjectSnapshot, Store,
};

/// Runs global power-creep intents.
pub struct PowerCreepStep;

/// Carry capacity granted per power-creep level.
const POWER_CREEP_CARRY_PER_LEVEL: u32 = 100;

fn owned_by<'a>(
    ctx: &GlobalContext<'a>,
    id: &ObjectId,
    user: &warren_core::UserId,
) -> Option<&'a RoomObjectSnapshot> {
    ctx.snapshot
        .market
        .power_creeps
        .get(id)
        .filter(|c| c.user.as_ref() == Some(user))
}

impl GlobalStep for PowerCreepStep {
    fn name(&self) -> &'static str {
        "powerCreep"
    }

    fn run(&self, ctx: &mut GlobalContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        for user_intents in &ctx.snapshot.market.intents {
            let user = &user_intents.user;
            for record in &user_intents.intents {
                let Some(argument) = record.first_argument() else {
                    continue;
                };
                match record.name.as_str() {
                    "createPowerCreep" => {
                        let Some(name) = argument.text("name") else {
                            continue;
                        };
                        let id = ObjectId::from(format!("{user}-{name}").as_str());
                        if ctx.snapshot.market.power_creeps.contains_key(&id) {
                            continue;
                        }
                        let Some(origin) = warren_core::RoomPosition::new(0, 0) else {
                            continue;
                        };
                        // roomless until deployed through a power spawn
                        let mut creep = RoomObjectSnapshot::new(
                            id,
                            ObjectKind::PowerCreep,
                            warren_core::RoomName::from(""),
                            origin,
                        );
                        creep.user = Some(user.clone());
                        creep.power_creep = Some(PowerCreepState::default());
                        ctx.writer.upsert_power_creep(creep);
                    }
                    "deletePowerCreep" => {
                        let Some(creep) = argument
                            .target_id()
                            .and_then(|id| owned_by(ctx, &id, user))
                        else {
                            continue;
                        };
                        // deployed creeps must despawn before deletion
                        if creep
                            .power_creep
                            .as_ref()
                            .is_some_and(|s| s.expires.is_some())
                        {
                            continue;
                        }
                        ctx.writer.remove_power_creep(creep.id.clone());
                    }
                    "renamePowerCreep" => {
                        let (Some(creep), Some(name)) = (
                            argument
                                .target_id()
                                .and_then(|id| owned_by(ctx, &id, user)),
                            argument.text("name"),
                        ) else {
                            continue;
                        };
                        let new_id = ObjectId::from(format!("{user}-{name}").as_str());
                        if new_id == creep.id
                            || ctx.snapshot.market.power_creeps.contains_key(&new_id)
                        {
                            continue;
                        }
                        let mut renamed = creep.clone();
                        renamed.id = new_id;
                        ctx.writer.remove_power_creep(creep.id.clone());
                        ctx.writer.upsert_power_creep(renamed);
                    }
                    "spawnPowerCreep" => {
                        let (Some(creep), Some(power_spawn)) = (
                            argument
                                .text("id")
                                .map(ObjectId::from)
                                .as_ref()
                                .and_then(|id| owned_by(ctx, id, user)),
                            argument
                                .text("targetId")
                                .map(ObjectId::from)
                                .as_ref()
                                .and_then(|id| ctx.snapshot.special_objects.get(id)),
                        ) else {
                            continue;
                        };
                        if power_spawn.kind != ObjectKind::PowerSpawn
                            || power_spawn.user.as_ref() != Some(user)
                        {
                            continue;
                        }
                        let Some(state) = &creep.power_creep else { continue };
                        if state.expires.is_some() {
                            continue;
                        }
                        let mut deployed = creep.clone();
                        deployed.room = power_spawn.room.clone();
                        deployed.pos = power_spawn.pos;
                        deployed.hits = Some(1000 * (state.level + 1));
                        deployed.hits_max = deployed.hits;
                        deployed.store = Some(Store::with_total_capacity(
                            POWER_CREEP_CARRY_PER_LEVEL * (state.level + 1),
                        ));
                        deployed.power_creep = Some(PowerCreepState {
                            expires: Some(GameTime(now.0 + POWER_CREEP_LIFE_TIME)),
                            ..state.clone()
                        });
                        ctx.writer.upsert_power_creep(deployed.clone());
                        ctx.writer
                            .upsert_object(power_spawn.room.clone(), deployed);
                        ctx.writer.mark_room_active(power_spawn.room.clone());
                    }
                    "upgradePowerCreep" => {
                        let (Some(creep), Some(power)) = (
                            argument
                                .target_id()
                                .and_then(|id| owned_by(ctx, &id, user)),
                            argument.amount("power").and_then(PowerKind::from_code),
                        ) else {
                            continue;
                        };
                        let Some(state) = &creep.power_creep else { continue };
                        if state.level >= POWER_CREEP_MAX_LEVEL {
                            continue;
                        }
                        let learned = state.powers.get(&power).map(|l| l.level).unwrap_or(0);
                        if learned >= 5 {
                            continue;
                        }
                        let mut powers = state.powers.clone();
                        powers.insert(
                            power,
                            PowerLevel {
                                level: learned + 1,
                                cooldown_until: None,
                            },
                        );
                        let mut upgraded = creep.clone();
                        upgraded.power_creep = Some(PowerCreepState {
                            level: state.level + 1,
                            powers,
                            ..state.clone()
                        });
                        ctx.writer.upsert_power_creep(upgraded);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_core::{
        GameTime, IntentArgument, IntentFieldValue, IntentRecord, RoomName, RoomPosition, UserId,
    };
    use warren_model::{GlobalSnapshot, GlobalUserIntents};
    use warren_mutation::{GlobalWriter, StatsSink};

    fn run(snapshot: &GlobalSnapshot) -> warren_mutation::GlobalBatch {
        let mut writer = GlobalWriter::new();
        let mut stats = StatsSink::new();
        let mut ctx = GlobalContext {
            snapshot,
            writer: &mut writer,
            stats: &mut stats,
        };
        PowerCreepStep.run(&mut ctx).unwrap();
        writer.into_batch()
    }

    fn intent(snap: &mut GlobalSnapshot, user: &str, name: &str, arg: IntentArgument) {
        snap.market.intents.push(GlobalUserIntents {
            user: UserId::from(user),
            intents: vec![IntentRecord::single(name, arg)],
        });
    }

    fn stored_creep(user: &str, name: &str, level: u32) -> RoomObjectSnapshot {
        let mut c = RoomObjectSnapshot::new(
            ObjectId::from(format!("{user}-{name}").as_str()),
            ObjectKind::PowerCreep,
            RoomName::from(""),
            RoomPosition::new(0, 0).unwrap(),
        );
        c.user = Some(UserId::from(user));
        c.power_creep = Some(PowerCreepState {
            level,
            ..Default::default()
        });
        c
    }

    #[test]
    fn create_then_upgrade_builds_level() {
        let mut snap = GlobalSnapshot::empty(GameTime(10));
        intent(
            &mut snap,
            "u1",
            "createPowerCreep",
            IntentArgument::default().with("name", IntentFieldValue::Text("ada".into())),
        );
        let batch = run(&snap);
        assert_eq!(batch.power_creep_upserts.len(), 1);
        assert_eq!(batch.power_creep_upserts[0].id, ObjectId::from("u1-ada"));

        let mut snap = GlobalSnapshot::empty(GameTime(11));
        let c = stored_creep("u1", "ada", 0);
        snap.market.power_creeps.insert(c.id.clone(), c);
        intent(
            &mut snap,
            "u1",
            "upgradePowerCreep",
            IntentArgument::default()
                .with("id", IntentFieldValue::Text("u1-ada".into()))
                .with("power", IntentFieldValue::Number(1.0)),
        );
        let batch = run(&snap);
        let state = batch.power_creep_upserts[0].power_creep.as_ref().unwrap();
        assert_eq!(state.level, 1);
        assert_eq!(state.powers[&PowerKind::GenerateOps].level, 1);
    }

    #[test]
    fn spawn_deploys_into_the_power_spawn_room() {
        let mut snap = GlobalSnapshot::empty(GameTime(10));
        let c = stored_creep("u1", "ada", 2);
        snap.market.power_creeps.insert(c.id.clone(), c);
        let mut ps = RoomObjectSnapshot::new(
            ObjectId::from("ps"),
            ObjectKind::PowerSpawn,
            RoomName::from("W1N1"),
            RoomPosition::new(20, 20).unwrap(),
        );
        ps.user = Some(UserId::from("u1"));
        snap.special_objects.insert(ps.id.clone(), ps);
        intent(
            &mut snap,
            "u1",
            "spawnPowerCreep",
            IntentArgument::default()
                .with("id", IntentFieldValue::Text("u1-ada".into()))
                .with("targetId", IntentFieldValue::Text("ps".into())),
        );
        let batch = run(&snap);
        let deployed = &batch.object_upserts[&RoomName::from("W1N1")][0];
        assert_eq!(deployed.pos, RoomPosition::new(20, 20).unwrap());
        assert_eq!(deployed.hits, Some(3000));
        assert_eq!(
            deployed.power_creep.as_ref().unwrap().expires,
            Some(GameTime(10 + POWER_CREEP_LIFE_TIME))
        );
        assert!(batch.active_rooms.contains(&RoomName::from("W1N1")));
    }

    #[test]
    fn foreign_creeps_cannot_be_deleted() {
        let mut snap = GlobalSnapshot::empty(GameTime(10));
        let c = stored_creep("u1", "ada", 0);
        snap.market.power_creeps.insert(c.id.clone(), c);
        intent(
            &mut snap,
            "u2",
            "deletePowerCreep",
            IntentArgument::default().with("id", IntentFieldValue::Text("u1-ada".into())),
        );
        let batch = run(&snap);
        assert!(batch.power_creep_removals.is_empty());
    }
}
