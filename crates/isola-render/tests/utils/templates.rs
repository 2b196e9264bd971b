//! Scripted template components.

use std::sync::Arc;
use std::time::Duration;

use isola_render::prelude::*;
use parking_lot::Mutex;

/// Shared log of template events, used to observe concurrency.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Builds a child component for a [`Step::Children`] step.
pub type ChildFactory = Arc<dyn Fn() -> ComponentValue + Send + Sync>;

/// One action of a scripted template.
#[derive(Clone)]
pub enum Step {
	/// Writes markup.
	Write(&'static str),
	/// Sleeps.
	Sleep(u64),
	/// Appends an event to the log.
	Log(&'static str),
	/// Writes the named slot.
	Slot(&'static str),
	/// Writes a prop value.
	Prop(&'static str),
	/// Instantiates every child first, then renders them in order.
	Children(Vec<ChildFactory>),
	/// Fails the render.
	Fail(&'static str),
}

/// Template factory running a fixed list of steps.
#[derive(Clone)]
pub struct ScriptedTemplate {
	steps: Vec<Step>,
	log: EventLog,
}

impl ScriptedTemplate {
	pub fn new(steps: Vec<Step>) -> Self {
		Self {
			steps,
			log: EventLog::default(),
		}
	}

	pub fn with_log(mut self, log: EventLog) -> Self {
		self.log = log;
		self
	}

	pub fn component(self) -> ComponentValue {
		ComponentValue::template(self)
	}
}

/// Wraps a template in a child factory.
pub fn child(template: ScriptedTemplate) -> ChildFactory {
	Arc::new(move || template.clone().component())
}

impl ComponentFactory for ScriptedTemplate {
	fn instantiate(
		&self,
		ctx: &RenderContext,
		_display_name: &str,
		props: Props,
		slots: ComponentSlots,
	) -> Box<dyn ComponentInstance> {
		Box::new(ScriptedInstance {
			ctx: ctx.clone(),
			steps: self.steps.clone(),
			log: Arc::clone(&self.log),
			props,
			slots,
		})
	}
}

struct ScriptedInstance {
	ctx: RenderContext,
	steps: Vec<Step>,
	log: EventLog,
	props: Props,
	slots: ComponentSlots,
}

#[async_trait]
impl ComponentInstance for ScriptedInstance {
	async fn render(self: Box<Self>, destination: &mut dyn RenderDestination) -> RenderResult<()> {
		for step in &self.steps {
			match step {
				Step::Write(html) => destination.write(RenderChunk::from(*html)),
				Step::Sleep(ms) => tokio::time::sleep(Duration::from_millis(*ms)).await,
				Step::Log(event) => self.log.lock().push((*event).to_string()),
				Step::Slot(name) => {
					if let Some(slot) = self.slots.get(name) {
						for chunk in slot.produce().await? {
							destination.write(chunk);
						}
					}
				}
				Step::Prop(name) => {
					let value = self
						.props
						.get(*name)
						.map(|v| v.to_string())
						.unwrap_or_default();
					destination.write(RenderChunk::Markup(value));
				}
				Step::Children(children) => {
					let mut instances = Vec::with_capacity(children.len());
					for make in children {
						instances.push(
							render_component(
								&self.ctx,
								"Child",
								make(),
								Props::new(),
								ComponentSlots::new(),
							)
							.await?,
						);
					}
					for instance in instances {
						instance.render(&mut *destination).await?;
					}
				}
				Step::Fail(message) => {
					return Err(RenderError::component(None, *message));
				}
			}
		}
		Ok(())
	}
}
