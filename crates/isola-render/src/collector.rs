//! Per-page script collection.
//!
//! When output is rendered to a string, instructions are replaced by the
//! scripts and head content they stand for. Each script is emitted at most
//! once per page.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::chunk::RenderInstruction;
use crate::directive::ClientDirective;
use crate::options::RenderOptions;

/// Styles emitted with the island runtime.
pub const ISLAND_STYLES: &str =
	"<style>astro-island,astro-slot,astro-static-slot{display:contents}</style>";

#[derive(Debug, Default)]
struct PageScripts {
	has_island_runtime: bool,
	directives: HashSet<String>,
	renderers: HashSet<String>,
	has_rendered_head: bool,
}

/// Tracks which scripts a page has already emitted.
#[derive(Debug, Default)]
pub struct ScriptCollector {
	state: Mutex<PageScripts>,
}

impl ScriptCollector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the markup for `instruction`, or an empty string when it has
	/// already been emitted.
	pub fn stringify(&self, options: &RenderOptions, instruction: &RenderInstruction) -> String {
		match instruction {
			RenderInstruction::Directive(hydration) => {
				self.directive_prescripts(options, &hydration.directive)
			}
			RenderInstruction::RendererHydrationScript {
				renderer_name,
				script,
			} => {
				if self.state.lock().renderers.insert(renderer_name.clone()) {
					script.clone()
				} else {
					String::new()
				}
			}
			RenderInstruction::Head | RenderInstruction::MaybeHead => self.head(options),
		}
	}

	/// Returns `true` once head content has been emitted.
	pub fn has_rendered_head(&self) -> bool {
		self.state.lock().has_rendered_head
	}

	/// Emits the head content if it was not emitted yet.
	pub fn head(&self, options: &RenderOptions) -> String {
		if options.partial {
			return String::new();
		}
		let mut state = self.state.lock();
		if state.has_rendered_head {
			return String::new();
		}
		state.has_rendered_head = true;
		options.head.clone()
	}

	fn directive_prescripts(&self, options: &RenderOptions, directive: &ClientDirective) -> String {
		let mut state = self.state.lock();
		let needs_runtime = !state.has_island_runtime;
		state.has_island_runtime = true;
		let needs_directive = state.directives.insert(directive.as_str().to_string());
		drop(state);

		let directive_script = if needs_directive {
			match options.directive_script(directive.as_str()) {
				Some(script) => script,
				None => {
					tracing::debug!(directive = %directive, "no script registered for directive");
					""
				}
			}
		} else {
			""
		};

		if needs_runtime {
			format!(
				"{ISLAND_STYLES}<script>{directive_script}{}</script>",
				options.island_runtime_script
			)
		} else if !directive_script.is_empty() {
			format!("<script>{directive_script}</script>")
		} else {
			String::new()
		}
	}
}
