//! Slot content and slot rendering.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, try_join_all};

use crate::chunk::{RenderChunk, RenderInstruction};
use crate::context::RenderContext;
use crate::error::RenderResult;

/// Name of the slot receiving unnamed children.
pub const DEFAULT_SLOT: &str = "default";

/// Future returned by a slot thunk.
pub type SlotFuture = BoxFuture<'static, RenderResult<Vec<RenderChunk>>>;

/// Content passed to a component slot.
#[derive(Clone)]
pub enum SlotContent {
	/// Literal markup.
	Markup(String),
	/// Pre-rendered chunks.
	Chunks(Vec<RenderChunk>),
	/// Content produced when the slot is rendered.
	Thunk(Arc<dyn Fn() -> SlotFuture + Send + Sync>),
}

impl SlotContent {
	/// Creates lazily produced slot content.
	pub fn thunk<F, Fut>(produce: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = RenderResult<Vec<RenderChunk>>> + Send + 'static,
	{
		Self::Thunk(Arc::new(move || Box::pin(produce()) as SlotFuture))
	}

	/// Produces the slot's chunks.
	pub async fn produce(&self) -> RenderResult<Vec<RenderChunk>> {
		match self {
			Self::Markup(html) => Ok(vec![RenderChunk::Markup(html.clone())]),
			Self::Chunks(chunks) => Ok(chunks.clone()),
			Self::Thunk(produce) => produce().await,
		}
	}
}

impl fmt::Debug for SlotContent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Markup(html) => f.debug_tuple("Markup").field(html).finish(),
			Self::Chunks(chunks) => f.debug_tuple("Chunks").field(chunks).finish(),
			Self::Thunk(_) => f.write_str("Thunk(..)"),
		}
	}
}

impl From<&str> for SlotContent {
	fn from(html: &str) -> Self {
		Self::Markup(html.to_string())
	}
}

impl From<String> for SlotContent {
	fn from(html: String) -> Self {
		Self::Markup(html)
	}
}

/// Insertion-ordered map keyed by slot name.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMap<T> {
	entries: Vec<(String, T)>,
}

impl<T> Default for SlotMap<T> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
		}
	}
}

impl<T> SlotMap<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a slot, replacing an existing one with the same name in place.
	pub fn insert(&mut self, name: impl Into<String>, value: T) {
		let name = name.into();
		match self.entries.iter_mut().find(|(key, _)| *key == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Builder form of [`insert`](Self::insert).
	pub fn with(mut self, name: impl Into<String>, value: impl Into<T>) -> Self {
		self.insert(name, value.into());
		self
	}

	pub fn get(&self, name: &str) -> Option<&T> {
		self.entries
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub fn values(&self) -> impl Iterator<Item = &T> {
		self.entries.iter().map(|(_, value)| value)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<String>, T> FromIterator<(K, T)> for SlotMap<T> {
	fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (name, value) in iter {
			map.insert(name, value);
		}
		map
	}
}

/// Slots passed to a component.
pub type ComponentSlots = SlotMap<SlotContent>;

/// Slots rendered to markup.
pub type RenderedSlots = SlotMap<String>;

/// A slot rendered to a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedSlot {
	/// Concatenated markup.
	pub html: String,
	/// Instructions found in the slot output, in order.
	pub instructions: Vec<RenderInstruction>,
}

/// Output of [`SlotRenderer::render_slots`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotsOutput {
	/// Rendered markup per slot, in slot order.
	pub children: RenderedSlots,
	/// Instructions from every slot, in slot order.
	pub slot_instructions: Vec<RenderInstruction>,
}

/// Renders slot content to strings.
#[async_trait]
pub trait SlotRenderer: Send + Sync {
	/// Renders one slot.
	async fn render_slot(&self, ctx: &RenderContext, slot: &SlotContent)
	-> RenderResult<RenderedSlot>;

	/// Renders every slot concurrently.
	async fn render_slots(
		&self,
		ctx: &RenderContext,
		slots: &ComponentSlots,
	) -> RenderResult<SlotsOutput> {
		let rendered = try_join_all(slots.values().map(|slot| self.render_slot(ctx, slot))).await?;

		let mut output = SlotsOutput::default();
		for ((name, _), slot) in slots.iter().zip(rendered) {
			output.slot_instructions.extend(slot.instructions);
			output.children.insert(name, slot.html);
		}
		Ok(output)
	}
}

/// Default [`SlotRenderer`].
///
/// Markup and bytes are concatenated, instructions are collected separately
/// and responses are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSlotRenderer;

#[async_trait]
impl SlotRenderer for DefaultSlotRenderer {
	async fn render_slot(
		&self,
		ctx: &RenderContext,
		slot: &SlotContent,
	) -> RenderResult<RenderedSlot> {
		let mut rendered = RenderedSlot::default();
		for chunk in slot.produce().await? {
			match chunk {
				RenderChunk::Instruction(instruction) => rendered.instructions.push(instruction),
				RenderChunk::Response(_) => {}
				other => rendered.html.push_str(&ctx.chunk_to_string(&other)),
			}
		}
		Ok(rendered)
	}
}
