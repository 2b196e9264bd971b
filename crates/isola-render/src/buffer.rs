//! Background rendering into an owned buffer.
//!
//! A [`BufferedRender`] starts a render on a spawned task right away. Chunks
//! written before the parent asks for them are held in a channel. Flushing
//! moves the held chunks to the real destination, then forwards the rest of
//! the task's writes as they arrive, then joins the task.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::chunk::{RenderChunk, RenderDestination};
use crate::error::{RenderError, RenderResult};

/// Destination handed to a background render.
#[derive(Debug)]
pub struct BufferWriter {
	tx: mpsc::UnboundedSender<RenderChunk>,
}

impl RenderDestination for BufferWriter {
	fn write(&mut self, chunk: RenderChunk) {
		// Send only fails once the owner was dropped without flushing, in
		// which case the output is unwanted.
		if self.tx.send(chunk).is_err() {
			tracing::trace!("buffered render discarded, dropping chunk");
		}
	}
}

/// Owner of a background render and its buffered output.
#[derive(Debug)]
pub struct BufferedRender {
	rx: mpsc::UnboundedReceiver<RenderChunk>,
	task: JoinHandle<RenderResult<()>>,
}

impl BufferedRender {
	/// Spawns `render` on the current Tokio runtime.
	///
	/// # Panics
	///
	/// Panics when called outside a Tokio runtime.
	pub fn spawn<F, Fut>(render: F) -> Self
	where
		F: FnOnce(BufferWriter) -> Fut,
		Fut: Future<Output = RenderResult<()>> + Send + 'static,
	{
		let (tx, rx) = mpsc::unbounded_channel();
		let task = tokio::spawn(render(BufferWriter { tx }));
		Self { rx, task }
	}

	/// Moves all output to `destination` and waits for the render to finish.
	///
	/// Errors from the render are returned once everything it wrote before
	/// failing has been forwarded.
	pub async fn flush_into(self, destination: &mut dyn RenderDestination) -> RenderResult<()> {
		let Self { mut rx, task } = self;

		let mut buffered = 0usize;
		while let Ok(chunk) = rx.try_recv() {
			destination.write(chunk);
			buffered += 1;
		}
		tracing::trace!(buffered, "flushed buffered chunks");

		while let Some(chunk) = rx.recv().await {
			destination.write(chunk);
		}

		match task.await {
			Ok(result) => result,
			Err(err) => Err(RenderError::Task(err.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	fn markup(chunks: &[RenderChunk]) -> String {
		chunks.iter().filter_map(RenderChunk::as_markup).collect()
	}

	#[tokio::test]
	async fn test_flush_forwards_buffered_then_live_chunks() {
		let (gate_tx, gate_rx) = tokio::sync::oneshot::channel::<()>();
		let buffered = BufferedRender::spawn(|mut writer| async move {
			writer.write("a".into());
			writer.write("b".into());
			let _ = gate_rx.await;
			writer.write("c".into());
			Ok::<(), RenderError>(())
		});

		tokio::time::sleep(Duration::from_millis(10)).await;
		let releaser = tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(10)).await;
			let _ = gate_tx.send(());
		});

		let mut out: Vec<RenderChunk> = Vec::new();
		buffered.flush_into(&mut out).await.unwrap();
		releaser.await.unwrap();
		assert_eq!(markup(&out), "abc");
	}

	#[tokio::test]
	async fn test_flush_propagates_error_after_partial_output() {
		let buffered = BufferedRender::spawn(|mut writer| async move {
			writer.write("partial".into());
			Err::<(), _>(RenderError::Config("boom".into()))
		});

		let mut out: Vec<RenderChunk> = Vec::new();
		let err = buffered.flush_into(&mut out).await.unwrap_err();
		assert!(matches!(err, RenderError::Config(_)));
		assert_eq!(markup(&out), "partial");
	}

	async fn exploding_render(writer: BufferWriter) -> RenderResult<()> {
		let _writer = writer;
		panic!("render exploded");
	}

	#[tokio::test]
	async fn test_flush_reports_panicked_task() {
		let buffered = BufferedRender::spawn(exploding_render);

		let mut out: Vec<RenderChunk> = Vec::new();
		let err = buffered.flush_into(&mut out).await.unwrap_err();
		assert!(matches!(err, RenderError::Task(_)));
	}
}
