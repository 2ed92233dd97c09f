use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::stream::Stream;
use pin_project::pin_project;

use crate::CallState;

/// Extension trait with stream utilities for observing snapshot sequences.
///
/// Snapshot streams never terminate on their own while the publisher is
/// alive, so consumers collecting a lifecycle sequence need a way to end the
/// stream once the interesting part has been observed.
pub trait CallStreamExt: Stream {
    /// Ends the stream after yielding the first item matching the predicate.
    ///
    /// The matching item is still produced; every item after it is dropped
    /// and the stream reports termination.
    ///
    /// ## Examples
    ///
    /// ```
    /// use callflow::CallStreamExt;
    ///
    /// async fn example(stream: impl futures_core::Stream<Item = u32>) {
    ///     let bounded = stream.finish_on(|&value| value > 5);
    ///     // `bounded` terminates once a value greater than 5 was yielded
    /// }
    /// ```
    fn finish_on<F>(self, test: F) -> FinishOn<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        FinishOn {
            stream: self,
            finished: false,
            test,
        }
    }

    /// Ends a snapshot stream after yielding the first settled snapshot.
    fn until_settled<T>(self) -> FinishOn<Self, fn(&CallState<T>) -> bool>
    where
        T: Clone,
        Self: Stream<Item = CallState<T>> + Sized,
    {
        self.finish_on(|state: &CallState<T>| state.is_completed())
    }
}

impl<T: ?Sized> CallStreamExt for T where T: Stream {}

/// Stream adapter created by [`CallStreamExt::finish_on`].
#[pin_project(project = FinishOnProj)]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct FinishOn<S, F> {
    #[pin]
    stream: S,
    finished: bool,
    test: F,
}

impl<S, F> Stream for FinishOn<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let FinishOnProj {
            stream,
            finished,
            test,
        } = self.project();

        if *finished {
            return Poll::Ready(None);
        }

        match stream.poll_next(cx) {
            Poll::Ready(Some(item)) => {
                if test(&item) {
                    *finished = true;
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                *finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
