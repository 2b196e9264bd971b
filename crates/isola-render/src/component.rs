//! Component values.
//!
//! A [`ComponentValue`] is anything that can be placed in a template: a
//! fragment, a function producing HTML, a template factory, a component owned
//! by a UI framework, a custom element tag or a future resolving to one of
//! those. Dispatch awaits pending values and classifies the result once.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::chunk::RenderDestination;
use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::props::Props;
use crate::slots::{ComponentSlots, RenderedSlots};

/// Stable identifier of a framework component.
///
/// Used as the key of [`RendererHints`](crate::renderer::RendererHints).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Cow<'static, str>);

impl ComponentId {
	pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&'static str> for ComponentId {
	fn from(id: &'static str) -> Self {
		Self(Cow::Borrowed(id))
	}
}

impl From<String> for ComponentId {
	fn from(id: String) -> Self {
		Self(Cow::Owned(id))
	}
}

/// Component producing markup directly from its rendered slots.
pub trait HtmlComponent: Send + Sync {
	fn render(&self, slots: &RenderedSlots) -> String;
}

impl<F> HtmlComponent for F
where
	F: Fn(&RenderedSlots) -> String + Send + Sync,
{
	fn render(&self, slots: &RenderedSlots) -> String {
		self(slots)
	}
}

/// Factory for compiled template components.
pub trait ComponentFactory: Send + Sync {
	/// Creates an instance bound to `props` and `slots`.
	fn instantiate(
		&self,
		ctx: &RenderContext,
		display_name: &str,
		props: Props,
		slots: ComponentSlots,
	) -> Box<dyn ComponentInstance>;
}

/// A template component instance ready to render.
#[async_trait]
pub trait ComponentInstance: Send {
	/// Writes the instance's output to `destination`.
	async fn render(self: Box<Self>, destination: &mut dyn RenderDestination) -> RenderResult<()>;
}

/// Custom element constructor information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeElement {
	/// Name the element was registered under, if known.
	pub defined_name: Option<String>,
	/// Name of the element's constructor, e.g. `HTMLMyCardElement`.
	pub constructor_name: String,
}

impl NativeElement {
	pub fn new(constructor_name: impl Into<String>) -> Self {
		Self {
			defined_name: None,
			constructor_name: constructor_name.into(),
		}
	}

	pub fn with_defined_name(mut self, name: impl Into<String>) -> Self {
		self.defined_name = Some(name.into());
		self
	}

	/// Returns the tag name used when serializing this element.
	///
	/// Without a registered name the constructor name is converted:
	/// `HTMLMyCardElement` becomes `html-my-card`.
	pub fn element_name(&self) -> String {
		if let Some(name) = &self.defined_name {
			return name.clone();
		}
		let base = self.constructor_name.as_str();
		let base = base.strip_prefix("HTML").unwrap_or(base);
		let base = base.strip_suffix("Element").unwrap_or(base);

		let mut name = String::with_capacity(base.len() + 8);
		for c in base.chars() {
			if c.is_ascii_uppercase() {
				name.push('-');
				name.push(c.to_ascii_lowercase());
			} else {
				name.push(c.to_ascii_lowercase());
			}
		}
		match name.strip_prefix('-') {
			Some(rest) => format!("html-{rest}"),
			None => name,
		}
	}
}

/// A component owned by a UI framework.
///
/// The wrapped value is opaque to this crate and only inspected by renderers.
#[derive(Clone)]
pub struct FrameworkComponent {
	id: ComponentId,
	value: Arc<dyn Any + Send + Sync>,
	element: Option<NativeElement>,
	needs_head_rendering: bool,
}

impl FrameworkComponent {
	pub fn new<T: Any + Send + Sync>(id: impl Into<ComponentId>, value: T) -> Self {
		Self {
			id: id.into(),
			value: Arc::new(value),
			element: None,
			needs_head_rendering: false,
		}
	}

	/// Creates a component backed by a custom element constructor.
	pub fn native(id: impl Into<ComponentId>, element: NativeElement) -> Self {
		Self {
			id: id.into(),
			value: Arc::new(()),
			element: Some(element),
			needs_head_rendering: false,
		}
	}

	/// Marks a page component that cannot emit head content itself.
	pub fn with_head_rendering(mut self) -> Self {
		self.needs_head_rendering = true;
		self
	}

	pub fn id(&self) -> &ComponentId {
		&self.id
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.downcast_ref::<T>()
	}

	pub fn native_element(&self) -> Option<&NativeElement> {
		self.element.as_ref()
	}

	pub fn needs_head_rendering(&self) -> bool {
		self.needs_head_rendering
	}
}

impl fmt::Debug for FrameworkComponent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FrameworkComponent")
			.field("id", &self.id)
			.field("element", &self.element)
			.finish_non_exhaustive()
	}
}

/// Any value that can be rendered as a component.
pub enum ComponentValue {
	Fragment,
	Html(Arc<dyn HtmlComponent>),
	Template(Arc<dyn ComponentFactory>),
	Framework(FrameworkComponent),
	/// Custom element tag name.
	Tag(String),
	/// Value still being loaded.
	Pending(BoxFuture<'static, RenderResult<ComponentValue>>),
	/// Null or undefined.
	Missing,
}

impl ComponentValue {
	pub fn html<F>(render: F) -> Self
	where
		F: Fn(&RenderedSlots) -> String + Send + Sync + 'static,
	{
		Self::Html(Arc::new(render))
	}

	pub fn template(factory: impl ComponentFactory + 'static) -> Self {
		Self::Template(Arc::new(factory))
	}

	pub fn tag(name: impl Into<String>) -> Self {
		Self::Tag(name.into())
	}

	pub fn pending<F>(future: F) -> Self
	where
		F: Future<Output = RenderResult<ComponentValue>> + Send + 'static,
	{
		Self::Pending(Box::pin(future))
	}

	/// Returns `true` for framework components flagged for head rendering.
	pub fn needs_head_rendering(&self) -> bool {
		matches!(self, Self::Framework(c) if c.needs_head_rendering())
	}

	/// Awaits pending values until a concrete component is reached.
	pub async fn resolve(self) -> RenderResult<ResolvedComponent> {
		let mut value = self;
		loop {
			value = match value {
				Self::Pending(future) => future.await?,
				Self::Fragment => return Ok(ResolvedComponent::Fragment),
				Self::Html(html) => return Ok(ResolvedComponent::Html(html)),
				Self::Template(factory) => return Ok(ResolvedComponent::Template(factory)),
				Self::Framework(c) => return Ok(ResolvedComponent::Framework(c)),
				Self::Tag(tag) => return Ok(ResolvedComponent::Tag(tag)),
				Self::Missing => return Ok(ResolvedComponent::Missing),
			};
		}
	}
}

impl fmt::Debug for ComponentValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Fragment => f.write_str("Fragment"),
			Self::Html(_) => f.write_str("Html(..)"),
			Self::Template(_) => f.write_str("Template(..)"),
			Self::Framework(c) => f.debug_tuple("Framework").field(c).finish(),
			Self::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
			Self::Pending(_) => f.write_str("Pending(..)"),
			Self::Missing => f.write_str("Missing"),
		}
	}
}

impl From<FrameworkComponent> for ComponentValue {
	fn from(component: FrameworkComponent) -> Self {
		Self::Framework(component)
	}
}

/// Kind of a resolved component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
	Fragment,
	Html,
	Template,
	Framework,
	Tag,
	Missing,
}

/// A [`ComponentValue`] with pending values awaited.
pub enum ResolvedComponent {
	Fragment,
	Html(Arc<dyn HtmlComponent>),
	Template(Arc<dyn ComponentFactory>),
	Framework(FrameworkComponent),
	Tag(String),
	Missing,
}

impl ResolvedComponent {
	pub fn kind(&self) -> ComponentKind {
		match self {
			Self::Fragment => ComponentKind::Fragment,
			Self::Html(_) => ComponentKind::Html,
			Self::Template(_) => ComponentKind::Template,
			Self::Framework(_) => ComponentKind::Framework,
			Self::Tag(_) => ComponentKind::Tag,
			Self::Missing => ComponentKind::Missing,
		}
	}
}

/// Borrowed view of the component handed to renderers.
#[derive(Debug, Clone, Copy)]
pub enum ComponentRef<'a> {
	Framework(&'a FrameworkComponent),
	Tag(&'a str),
	Missing,
}

impl<'a> ComponentRef<'a> {
	/// Returns the framework component, if any.
	pub fn framework(&self) -> Option<&'a FrameworkComponent> {
		match self {
			Self::Framework(c) => Some(c),
			_ => None,
		}
	}

	pub fn is_tag(&self) -> bool {
		matches!(self, Self::Tag(_))
	}
}
