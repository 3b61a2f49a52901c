//! Market processing: terminal sends, deals, and order management.

use crate::step::{GlobalContext, GlobalStep};
use indexmap::IndexMap;
use warren_core::{
    GameTime, ObjectId, OrderId, ResourceKind, RoomName, StepFault, TERMINAL_COOLDOWN,
    TERMINAL_SEND_COST_SCALE,
};
use warren_model::{MarketOrder, OrderKind, Store};
use warren_mutation::{ObjectPatch, OrderPatch, StatKind, TransactionLogEntry, UserPatch};

/// Fraction of `price * amount` charged as the order-creation fee.
const ORDER_FEE_RATE: f64 = 0.05;

/// Energy cost of hauling `amount` units over `distance` rooms.
pub fn transfer_energy_cost(amount: u32, distance: u32) -> u32 {
    let decay = 1.0 - (-f64::from(distance) / TERMINAL_SEND_COST_SCALE).exp();
    (f64::from(amount) * decay).ceil() as u32
}

/// Runs terminal sends, deals, and order management.
pub struct MarketStep;

/// Step-local working state: terminal stores and account balances are
/// read once from the snapshot and mutated in place, then written back
/// as absolute values.
struct MarketScratch {
    stores: IndexMap<ObjectId, Store>,
    money: IndexMap<warren_core::UserId, f64>,
    remaining: IndexMap<OrderId, u32>,
}

impl MarketScratch {
    fn new(ctx: &GlobalContext<'_>) -> Self {
        Self {
            stores: ctx
                .snapshot
                .special_objects
                .values()
                .filter_map(|o| o.store.clone().map(|s| (o.id.clone(), s)))
                .collect(),
            money: ctx
                .snapshot
                .market
                .users
                .values()
                .map(|u| (u.id.clone(), u.money))
                .collect(),
            remaining: ctx
                .snapshot
                .market
                .orders
                .values()
                .map(|o| (o.id.clone(), o.remaining))
                .collect(),
        }
    }
}

fn violation(id: &ObjectId, err: impl std::fmt::Display) -> StepFault {
    StepFault::StoreViolation {
        object: id.to_string(),
        reason: err.to_string(),
    }
}

/// Moves `amount` of `resource` between two terminal stores in the
/// scratch, charging `payer` the distance cost in energy. Returns false
/// without touching anything when funds or capacity fall short.
fn haul(
    scratch: &mut MarketScratch,
    from: &ObjectId,
    to: &ObjectId,
    payer: &ObjectId,
    resource: ResourceKind,
    amount: u32,
    cost: u32,
) -> Result<bool, StepFault> {
    let (Some(src), Some(dst), Some(pay)) = (
        scratch.stores.get(from).cloned(),
        scratch.stores.get(to).cloned(),
        scratch.stores.get(payer).cloned(),
    ) else {
        return Ok(false);
    };
    let energy_needed = if payer == from && resource == ResourceKind::Energy {
        amount + cost
    } else {
        cost
    };
    if src.get(resource) < amount
        || pay.energy() < energy_needed
        || dst.free_capacity(resource) < amount
    {
        return Ok(false);
    }
    let src = src
        .with_removed(resource, amount)
        .map_err(|e| violation(from, e))?;
    scratch.stores.insert(from.clone(), src);
    let dst = scratch.stores[to]
        .with_added(resource, amount)
        .map_err(|e| violation(to, e))?;
    scratch.stores.insert(to.clone(), dst);
    let pay = scratch.stores[payer]
        .with_removed(ResourceKind::Energy, cost)
        .map_err(|e| violation(payer, e))?;
    scratch.stores.insert(payer.clone(), pay);
    Ok(true)
}

impl GlobalStep for MarketStep {
    fn name(&self) -> &'static str {
        "market"
    }

    fn run(&self, ctx: &mut GlobalContext<'_>) -> Result<(), StepFault> {
        let now = ctx.now();
        let mut scratch = MarketScratch::new(ctx);

        // terminal sends, room by room in snapshot order
        for (from_room, sends) in &ctx.snapshot.room_sends {
            for pending in sends {
                let Some(terminal) = ctx.snapshot.special_objects.get(&pending.terminal) else {
                    continue;
                };
                if !terminal.cooldown_ready(now) || &terminal.room != from_room {
                    continue;
                }
                let send = &pending.send;
                let Some(dest) = ctx.snapshot.terminal_in(&send.to_room) else {
                    continue;
                };
                let Some(distance) = from_room.range_to(&send.to_room) else {
                    continue;
                };
                let cost = transfer_energy_cost(send.amount, distance);
                let moved = haul(
                    &mut scratch,
                    &terminal.id,
                    &dest.id,
                    &terminal.id,
                    send.resource,
                    send.amount,
                    cost,
                )?;
                if !moved {
                    continue;
                }
                ctx.writer.patch_object(
                    terminal.id.clone(),
                    ObjectPatch {
                        cooldown_until: Some(Some(GameTime(now.0 + TERMINAL_COOLDOWN))),
                        ..Default::default()
                    },
                );
                ctx.writer.log_transaction(TransactionLogEntry {
                    time: now,
                    sender: terminal.user.clone(),
                    recipient: dest.user.clone(),
                    resource: send.resource,
                    amount: send.amount,
                    from_room: from_room.clone(),
                    to_room: send.to_room.clone(),
                    description: send.description.clone(),
                    order: None,
                });
                if let Some(user) = &terminal.user {
                    ctx.stats
                        .record(user, StatKind::ResourcesSent, u64::from(send.amount));
                }
                ctx.writer.mark_room_active(from_room.clone());
                ctx.writer.mark_room_active(send.to_room.clone());
            }
        }

        // global market intents, per user in submission order
        for user_intents in &ctx.snapshot.market.intents {
            let user = &user_intents.user;
            for record in &user_intents.intents {
                let Some(argument) = record.first_argument() else {
                    continue;
                };
                match record.name.as_str() {
                    "createOrder" => {
                        let (Some(kind), Some(resource), Some(price), Some(total)) = (
                            argument.text("type"),
                            argument.resource(),
                            argument.number("price"),
                            argument.amount("totalAmount"),
                        ) else {
                            continue;
                        };
                        let kind = match kind {
                            "buy" => OrderKind::Buy,
                            "sell" => OrderKind::Sell,
                            _ => continue,
                        };
                        if price <= 0.0 || total == 0 {
                            continue;
                        }
                        let fee = price * f64::from(total) * ORDER_FEE_RATE;
                        let balance = scratch.money.entry(user.clone()).or_insert(0.0);
                        if *balance < fee {
                            continue;
                        }
                        *balance -= fee;
                        let room = argument.text("roomName").map(RoomName::from);
                        ctx.writer.upsert_order(MarketOrder {
                            id: OrderId::from(
                                format!("{}-{}-{}", user, record.name, now.0).as_str(),
                            ),
                            user: user.clone(),
                            kind,
                            resource,
                            price,
                            remaining: total,
                            room,
                            active: true,
                            created: now,
                        });
                    }
                    "cancelOrder" => {
                        let Some(order) = argument
                            .text("orderId")
                            .and_then(|id| ctx.snapshot.market.orders.get(&OrderId::from(id)))
                        else {
                            continue;
                        };
                        if &order.user == user {
                            ctx.writer.remove_order(order.id.clone());
                        }
                    }
                    "deal" => {
                        let (Some(order), Some(amount), Some(dealer_room)) = (
                            argument
                                .text("orderId")
                                .and_then(|id| ctx.snapshot.market.orders.get(&OrderId::from(id))),
                            argument.amount("amount"),
                            argument.text("targetRoomName").map(RoomName::from),
                        ) else {
                            continue;
                        };
                        if !order.active || &order.user == user {
                            continue;
                        }
                        let left = scratch
                            .remaining
                            .get(&order.id)
                            .copied()
                            .unwrap_or(order.remaining);
                        let amount = amount.min(left);
                        if amount == 0 {
                            continue;
                        }
                        let (Some(order_room), Some(order_terminal)) = (
                            order.room.clone(),
                            order
                                .room
                                .as_ref()
                                .and_then(|r| ctx.snapshot.terminal_in(r)),
                        ) else {
                            continue;
                        };
                        let Some(dealer_terminal) = ctx.snapshot.terminal_in(&dealer_room)
                        else {
                            continue;
                        };
                        let Some(distance) = order_room.range_to(&dealer_room) else {
                            continue;
                        };
                        let cost = transfer_energy_cost(amount, distance);
                        let price = order.price * f64::from(amount);
                        // the dealer always pays the haul; money flows by side
                        let (res_from, res_to, buyer, seller) = match order.kind {
                            OrderKind::Sell => (
                                &order_terminal.id,
                                &dealer_terminal.id,
                                user.clone(),
                                order.user.clone(),
                            ),
                            OrderKind::Buy => (
                                &dealer_terminal.id,
                                &order_terminal.id,
                                order.user.clone(),
                                user.clone(),
                            ),
                        };
                        if scratch.money.get(&buyer).copied().unwrap_or(0.0) < price {
                            continue;
                        }
                        let moved = haul(
                            &mut scratch,
                            res_from,
                            res_to,
                            &dealer_terminal.id,
                            order.resource,
                            amount,
                            cost,
                        )?;
                        if !moved {
                            continue;
                        }
                        *scratch.money.entry(buyer.clone()).or_insert(0.0) -= price;
                        *scratch.money.entry(seller.clone()).or_insert(0.0) += price;
                        scratch.remaining.insert(order.id.clone(), left - amount);
                        ctx.writer.patch_order(
                            order.id.clone(),
                            OrderPatch {
                                remaining: Some(left - amount),
                                active: Some(left - amount > 0),
                                ..Default::default()
                            },
                        );
                        ctx.writer.log_transaction(TransactionLogEntry {
                            time: now,
                            sender: Some(seller),
                            recipient: Some(buyer),
                            resource: order.resource,
                            amount,
                            from_room: match order.kind {
                                OrderKind::Sell => order_room.clone(),
                                OrderKind::Buy => dealer_room.clone(),
                            },
                            to_room: match order.kind {
                                OrderKind::Sell => dealer_room.clone(),
                                OrderKind::Buy => order_room.clone(),
                            },
                            description: None,
                            order: Some(order.id.clone()),
                        });
                        ctx.writer.mark_room_active(order_room);
                        ctx.writer.mark_room_active(dealer_room);
                    }
                    _ => {}
                }
            }
        }

        // write back what actually changed, as absolute values
        for (id, store) in scratch.stores {
            let unchanged = ctx
                .snapshot
                .special_objects
                .get(&id)
                .is_some_and(|o| o.store.as_ref() == Some(&store));
            if !unchanged {
                ctx.writer.patch_object(
                    id,
                    ObjectPatch {
                        store: Some(store),
                        ..Default::default()
                    },
                );
            }
        }
        for (user, money) in scratch.money {
            let unchanged = ctx
                .snapshot
                .market
                .users
                .get(&user)
                .is_some_and(|u| u.money == money);
            if !unchanged {
                ctx.writer.patch_user(
                    user,
                    UserPatch {
                        money: Some(money),
                        ..Default::default()
                    },
                );
            }
        }
        Ok(())
    }
}
