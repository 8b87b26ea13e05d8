use std::collections::HashSet;

use glam::Vec3;
use hecs::Entity;
use serde::Serialize;
use tracing::{debug, info};

use crate::actions::{ControlAction, LookAtAction, LookCtx, MoveState};
use crate::body::Body;
use crate::camera::Camera;
use crate::components::{LayerMask, QueryFilter};
use crate::config::{Config, ControlSettings, ControlType, LookAtSettings};
use crate::control::StepCtx;
use crate::engine::input::InputState;
use crate::engine::time::FixedClock;
use crate::error::{Error, Result};
use crate::events::{EventBus, GameEvent};
use crate::pose::Pose;
use crate::scene::{PhysicsQuery, PhysicsScene};

/// Agents are addressed by their root entity.
pub type AgentId = Entity;

/// A controllable body and the action driving it.
#[derive(Debug)]
pub struct Agent {
    pub body: Body,
    pub action: ControlAction,
}

impl Agent {
    pub fn is_player(&self) -> bool {
        self.action.settings().is_player
    }
}

/// A body that turns to face the player.
#[derive(Debug)]
pub struct LookAtModel {
    pub body: Body,
    pub action: LookAtAction,
}

/// One agent's state after a step, as written by `--trace`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    pub step: u64,
    pub agent: u64,
    pub control: ControlType,
    pub state: MoveState,
    pub position: Vec3,
    pub forward: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_ground: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_jump: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deform_scale: Option<Vec3>,
}

/// Owns the scene, agents, look-at models, clock and event queue, and
/// runs them one fixed step at a time.
pub struct Simulation {
    pub scene: PhysicsScene,
    config: Config,
    clock: FixedClock,
    agents: Vec<Agent>,
    look_ats: Vec<LookAtModel>,
    /// Hazards a player part is currently inside.
    tripped_hazards: HashSet<Entity>,
    events: EventBus,
}

impl Simulation {
    pub fn new(mut scene: PhysicsScene, config: Config) -> Self {
        scene.refresh();
        Self {
            scene,
            clock: FixedClock::new(config.fixed_dt),
            config,
            agents: Vec::new(),
            look_ats: Vec::new(),
            tripped_hazards: HashSet::new(),
            events: EventBus::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &FixedClock {
        &self.clock
    }

    /// Builds a body from `layout` at `pose` and binds a control action to it.
    pub fn spawn_agent(
        &mut self,
        layout: &[(Vec3, Vec3)],
        pose: Pose,
        settings: ControlSettings,
    ) -> Result<AgentId> {
        settings.validate()?;
        let body = Body::assemble(&mut self.scene, layout, pose)?;
        if settings.is_player {
            self.scene.set_layer(&body.parts, LayerMask::PLAYER);
        }
        let action = ControlAction::new(
            settings,
            &self.config,
            body.bounds,
            body.pivot_offset,
            &body.pose,
        );
        let id = body.root;
        info!(
            agent = ?id,
            control = ?action.settings().control_type,
            input = ?action.settings().input_type,
            player = action.settings().is_player,
            "agent spawned"
        );
        self.agents.push(Agent { body, action });
        Ok(id)
    }

    pub fn spawn_look_at(
        &mut self,
        layout: &[(Vec3, Vec3)],
        pose: Pose,
        settings: LookAtSettings,
    ) -> Result<Entity> {
        let body = Body::assemble(&mut self.scene, layout, pose)?;
        let id = body.root;
        info!(model = ?id, rotate = ?settings.rotate, "look-at model spawned");
        self.look_ats.push(LookAtModel {
            body,
            action: LookAtAction::new(settings),
        });
        Ok(id)
    }

    /// Destroys an agent. Its control is deactivated first; losing the
    /// player ends the game.
    pub fn remove_agent(&mut self, id: AgentId) -> Result<Agent> {
        let index = self
            .agents
            .iter()
            .position(|a| a.body.root == id)
            .ok_or(Error::UnknownBody(id))?;
        let mut agent = self.agents.remove(index);
        agent.action.deactivate();
        for &part in &agent.body.parts {
            self.scene.despawn(part);
        }
        self.scene.despawn(agent.body.root);
        info!(agent = ?id, "agent removed");
        if agent.is_player() {
            self.events.broadcast(GameEvent::GameOver { win: false });
        }
        Ok(agent)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.body.root == id)
    }

    pub fn look_at(&self, id: Entity) -> Option<&LookAtModel> {
        self.look_ats.iter().find(|m| m.body.root == id)
    }

    /// Root position of the first active player agent.
    pub fn player_position(&self) -> Option<Vec3> {
        self.agents
            .iter()
            .find(|a| a.is_player() && a.action.is_active())
            .map(|a| a.body.pose.position)
    }

    /// Runs one fixed step: agents, then look-at models, then hazards.
    pub fn step(&mut self, input: &InputState, camera: &Camera) {
        let dt = self.clock.dt;

        for agent in &mut self.agents {
            let mut ctx = StepCtx {
                pose: &mut agent.body.pose,
                parts: &agent.body.parts,
                input,
                camera,
                physics: &self.scene,
                dt,
            };
            agent.action.step(&mut ctx);
            agent.body.sync(&mut self.scene);
        }

        let player = self.player_position();
        for model in &mut self.look_ats {
            let mut ctx = LookCtx {
                pose: &mut model.body.pose,
                pivot_offset: model.body.pivot_offset,
                parts: &model.body.parts,
                physics: &self.scene,
                player,
                dt,
            };
            model.action.step(&mut ctx);
            model.body.sync(&mut self.scene);
        }

        self.check_hazards();
        self.clock.advance();
    }

    /// Banks `frame_dt` and runs every fixed step that became due. Button
    /// edges are consumed by the first of them. Returns the steps run.
    pub fn advance(&mut self, frame_dt: f32, input: &mut InputState, camera: &Camera) -> usize {
        let due = self.clock.accumulate(frame_dt);
        for _ in 0..due {
            self.step(input, camera);
            input.end_step();
        }
        due
    }

    fn check_hazards(&mut self) {
        let players = QueryFilter::solid(LayerMask::PLAYER);
        for hazard in self.scene.hazards() {
            let touched = !self.scene.touching(hazard, players).is_empty();
            if touched && self.tripped_hazards.insert(hazard) {
                debug!(?hazard, "player entered hazard");
                self.events.broadcast(GameEvent::GameOver { win: false });
            } else if !touched {
                self.tripped_hazards.remove(&hazard);
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|agent| {
                let control = agent.action.control();
                let character = control.as_character();
                AgentSnapshot {
                    step: self.clock.steps,
                    agent: agent.body.root.to_bits().get(),
                    control: agent.action.settings().control_type,
                    state: agent.action.state(),
                    position: agent.body.pose.position,
                    forward: agent.body.pose.forward(),
                    on_ground: character.map(|c| c.on_ground()),
                    in_jump: character.map(|c| c.jump().in_jump),
                    deform_scale: character.map(|c| c.animation().scale()),
                }
            })
            .collect()
    }
}
