//! Render chunks and destinations.

use std::sync::Arc;

use bytes::Bytes;

use crate::directive::HydrationMetadata;

/// Instruction interleaved with markup in the render stream.
///
/// Instructions are resolved into markup by the consumer of the stream, which
/// decides whether the referenced scripts still need to be emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
	/// A hydrated component follows; its runtime and directive script may be
	/// required.
	Directive(HydrationMetadata),
	/// Script a renderer needs before its islands hydrate.
	RendererHydrationScript {
		/// Renderer the script belongs to.
		renderer_name: String,
		/// Inline script markup.
		script: String,
	},
	/// Head content must be emitted here.
	Head,
	/// Head content must be emitted here unless already emitted.
	MaybeHead,
}

/// A unit of rendered output.
#[derive(Debug, Clone)]
pub enum RenderChunk {
	/// HTML markup.
	Markup(String),
	/// Raw bytes, expected to be UTF-8.
	Bytes(Bytes),
	/// Structured stream instruction.
	Instruction(RenderInstruction),
	/// Framework-native response. Dropped by string rendering.
	Response(Arc<http::Response<Bytes>>),
}

impl RenderChunk {
	/// Returns the markup, if this is a markup chunk.
	pub fn as_markup(&self) -> Option<&str> {
		match self {
			Self::Markup(s) => Some(s),
			_ => None,
		}
	}
}

impl From<String> for RenderChunk {
	fn from(s: String) -> Self {
		Self::Markup(s)
	}
}

impl From<&str> for RenderChunk {
	fn from(s: &str) -> Self {
		Self::Markup(s.to_string())
	}
}

impl From<Bytes> for RenderChunk {
	fn from(bytes: Bytes) -> Self {
		Self::Bytes(bytes)
	}
}

impl From<RenderInstruction> for RenderChunk {
	fn from(instruction: RenderInstruction) -> Self {
		Self::Instruction(instruction)
	}
}

/// Append-only sink for render chunks.
pub trait RenderDestination: Send {
	/// Appends a chunk.
	fn write(&mut self, chunk: RenderChunk);
}

impl RenderDestination for Vec<RenderChunk> {
	fn write(&mut self, chunk: RenderChunk) {
		self.push(chunk);
	}
}

impl<D: RenderDestination + ?Sized> RenderDestination for &mut D {
	fn write(&mut self, chunk: RenderChunk) {
		(**self).write(chunk);
	}
}
