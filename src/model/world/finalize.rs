use crate::model::lifecycle::AgentBundle;
use crate::model::world::update::TickOutcome;
use crate::model::world::World;
use hecs::Entity;
use worldsim_data::{DeathCause, Fertility, Identity, SimEvent, Vitals};

impl World {
    pub fn finalize_tick(&mut self, outcome: TickOutcome, events: &mut Vec<SimEvent>) {
        self.process_deaths(&outcome.deaths, events);
        self.process_births(outcome.births, events);
    }

    /// Removes every agent that died this tick, so none survive into the next.
    pub fn process_deaths(&mut self, deaths: &[(Entity, DeathCause)], events: &mut Vec<SimEvent>) {
        for &(handle, cause) in deaths {
            let (Some(identity), Some(vitals), Some(fertility)) = (
                self.component::<Identity>(handle),
                self.component::<Vitals>(handle),
                self.component::<Fertility>(handle),
            ) else {
                continue;
            };
            if let Err(e) = self.destroy_agent(handle) {
                tracing::warn!(error = %e, id = %identity.id, "Dead agent already removed");
                continue;
            }
            tracing::debug!(
                id = %identity.id,
                name = %identity.name,
                cause = ?cause,
                age = vitals.age,
                "Agent died"
            );
            self.metrics.increment_counter("deaths");
            self.metrics
                .increment_counter(&format!("deaths.{cause:?}").to_lowercase());
            events.push(SimEvent::Death {
                id: identity.id,
                name: identity.name,
                cause,
                age: vitals.age,
                children: fertility.children,
                tick: self.tick,
            });
        }
    }

    pub fn process_births(&mut self, births: Vec<AgentBundle>, events: &mut Vec<SimEvent>) {
        for bundle in births {
            let event = SimEvent::Birth {
                id: bundle.identity.id,
                name: bundle.identity.name.clone(),
                kind: bundle.identity.kind,
                parents: bundle.identity.parents,
                tick: self.tick,
                x: bundle.position.x,
                y: bundle.position.y,
            };
            self.spawn_bundle(bundle);
            self.metrics.increment_counter("births");
            events.push(event);
        }
    }
}
