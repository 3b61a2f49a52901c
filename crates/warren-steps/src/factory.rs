//! Factory commodity production.

use crate::context::{StepContext, StoreScratch};
use crate::step::RoomStep;
use warren_core::{GameTime, ObjectId, ResourceKind, StepFault, FACTORY_COOLDOWN};
use warren_model::ObjectKind;
use warren_mutation::ObjectPatch;

/// One factory recipe: inputs consumed, output produced per run.
pub struct FactoryRecipe {
    /// The product.
    pub output: ResourceKind,
    /// Units produced per run.
    pub amount: u32,
    /// Ingredients consumed per run.
    pub inputs: &'static [(ResourceKind, u32)],
}

/// The closed production table.
pub const FACTORY_RECIPES: &[FactoryRecipe] = &[
    FactoryRecipe {
        output: ResourceKind::Battery,
        amount: 50,
        inputs: &[(ResourceKind::Energy, 600)],
    },
    FactoryRecipe {
        output: ResourceKind::Energy,
        amount: 500,
        inputs: &[(ResourceKind::Battery, 50)],
    },
    FactoryRecipe {
        output: ResourceKind::Ghodium,
        amount: 10,
        inputs: &[
            (ResourceKind::ZynthiumKeanite, 2),
            (ResourceKind::UtriumLemergite, 2),
            (ResourceKind::Energy, 40),
        ],
    },
];

/// The recipe producing `output`, if the table has one.
pub fn factory_recipe(output: ResourceKind) -> Option<&'static FactoryRecipe> {
    FACTORY_RECIPES.iter().find(|r| r.output == output)
}

/// Applies `produce` intents.
pub struct FactoryStep;

impl RoomStep for FactoryStep {
    fn name(&self) -> &'static str {
        "factory"
    }

    fn run(&self, ctx: &mut StepContext<'_>) -> Result<(), StepFault> {
        let mut stores = StoreScratch::new();

        let intents: Vec<_> = ctx.intents.named("produce").cloned().collect();
        for intent in intents {
            let Some(factory) = ctx.snapshot.object(&intent.actor) else {
                continue;
            };
            if factory.kind != ObjectKind::Factory || !factory.cooldown_ready(ctx.now()) {
                continue;
            }
            let Some(recipe) = intent.argument.resource().and_then(factory_recipe) else {
                continue;
            };
            let Some(store) = stores.current(ctx.snapshot, &factory.id) else {
                continue;
            };
            if recipe.inputs.iter().any(|&(r, n)| store.get(r) < n)
                || store.free_capacity(recipe.output) < recipe.amount
            {
                continue;
            }
            let fault = |id: &ObjectId, e: warren_model::StoreArithmeticError| {
                StepFault::StoreViolation {
                    object: id.to_string(),
                    reason: e.to_string(),
                }
            };
            let mut store = store;
            for &(r, n) in recipe.inputs {
                store = store.with_removed(r, n).map_err(|e| fault(&factory.id, e))?;
            }
            store = store
                .with_added(recipe.output, recipe.amount)
                .map_err(|e| fault(&factory.id, e))?;
            stores.put(&factory.id, store);
            ctx.writer.patch(
                factory.id.clone(),
                ObjectPatch {
                    cooldown_until: Some(Some(GameTime(ctx.now().0 + FACTORY_COOLDOWN))),
                    ..Default::default()
                },
            );
        }

        stores.flush(ctx.writer);
        Ok(())
    }
}
