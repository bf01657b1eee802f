//! Message buffer sizing and stack-allocation policy
//!
//! Wire bindings place a message buffer on the stack only when its worst-case
//! size is small. Client and server are mirror images: each side may trust
//! the size of what it writes, but a flexible message it reads can grow.

use super::TransportLimits;
use crate::ir::TypeShape;
use serde::Serialize;

/// Whether a message size is known up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundedness {
    /// Size is `inline + out-of-line`
    Bounded,
    /// Size may grow to the transport maximum
    Unbounded,
}

/// Where a message buffer lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferStorage {
    /// Inside the calling frame
    Inline,
    /// Heap allocated
    Boxed,
}

/// A sized message buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBuffer {
    /// Size in bytes
    pub size: u32,
    /// Size as it appears in generated code
    pub size_text: String,
    /// Storage class
    pub storage: BufferStorage,
}

/// Round up to the 8-byte wire alignment
pub fn fidl_align(size: u64) -> u64 {
    (size + 7) & !7
}

impl MessageBuffer {
    /// Size a buffer for `inline_size + max_out_of_line` bytes
    pub fn compute(
        inline_size: u32,
        max_out_of_line: u32,
        boundedness: Boundedness,
        limits: &TransportLimits,
    ) -> Self {
        let total = u64::from(inline_size) + u64::from(max_out_of_line);
        let (size, size_text) = if boundedness == Boundedness::Unbounded
            || total > u64::from(limits.max_message_size)
        {
            (limits.max_message_size, limits.max_message_size_name.clone())
        } else {
            let aligned = fidl_align(total).min(u64::from(u32::MAX)) as u32;
            (aligned, aligned.to_string())
        };
        let storage = if size > limits.stack_alloc_threshold {
            BufferStorage::Boxed
        } else {
            BufferStorage::Inline
        };
        Self {
            size,
            size_text,
            storage,
        }
    }

    /// C++ buffer type, e.g. `::fidl::internal::InlineMessageBuffer<32>`
    pub fn type_name(&self) -> String {
        let template = match self.storage {
            BufferStorage::Inline => "InlineMessageBuffer",
            BufferStorage::Boxed => "BoxedMessageBuffer",
        };
        format!("::fidl::internal::{}<{}>", template, self.size_text)
    }
}

/// Wire-shape facts of one message direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MessageLayout {
    /// Inline bytes, including the header
    pub inline_size: u32,
    /// Worst-case out-of-line bytes
    pub max_out_of_line: u32,
    /// Worst-case handle count
    pub max_handles: u32,
    /// Whether the encoding contains padding
    pub has_padding: bool,
    /// Whether the message contains a flexible envelope
    pub has_flexible_envelope: bool,
    /// Whether the message has out-of-line parts
    pub has_indirection: bool,
    /// Whether any parameter is a resource
    pub is_resource: bool,
    /// Whether the message has no parameters
    pub is_empty: bool,
}

impl MessageLayout {
    /// Layout of a message with the given shape and parameter facts
    pub fn new(shape: &TypeShape, param_count: usize, is_resource: bool) -> Self {
        Self {
            inline_size: shape.inline_size,
            max_out_of_line: shape.max_out_of_line,
            max_handles: shape.max_handles,
            has_padding: shape.has_padding,
            has_flexible_envelope: shape.has_flexible_envelope,
            has_indirection: shape.depth > 0,
            is_resource,
            is_empty: param_count == 0,
        }
    }

    /// `inline + out-of-line`, saturating
    pub fn raw_size(&self) -> u32 {
        self.inline_size.saturating_add(self.max_out_of_line)
    }

    /// Buffer sized as if the message were bounded
    pub fn bounded_buffer(&self, limits: &TransportLimits) -> MessageBuffer {
        MessageBuffer::compute(
            self.inline_size,
            self.max_out_of_line,
            Boundedness::Bounded,
            limits,
        )
    }

    /// Whether the aligned, uncapped message size fits under the stack threshold
    pub fn fits_on_stack(&self, limits: &TransportLimits) -> bool {
        let total = u64::from(self.inline_size) + u64::from(self.max_out_of_line);
        fidl_align(total) <= u64::from(limits.stack_alloc_threshold)
    }

    /// Largest response a client may receive
    pub fn received_max_size(&self) -> u32 {
        if self.has_flexible_envelope {
            u32::MAX
        } else {
            self.raw_size()
        }
    }
}

/// Side of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallContext {
    /// Writes the request, reads the response
    Client,
    /// Reads the request, writes the response
    Server,
}

/// Allocation decisions for one side of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContextProps {
    /// Request buffer on the stack
    pub stack_alloc_request: bool,
    /// Response buffer on the stack
    pub stack_alloc_response: bool,
    /// Stack bytes used by the request
    pub stack_use_request: u32,
    /// Stack bytes used by the response
    pub stack_use_response: u32,
}

/// Decide buffer placement for one side of a call
pub fn context_props(
    context: CallContext,
    request: &MessageLayout,
    response: &MessageLayout,
    limits: &TransportLimits,
) -> ContextProps {
    let written = |m: &MessageLayout| m.is_empty || m.fits_on_stack(limits);
    let read = |m: &MessageLayout| {
        m.is_empty || (!m.has_flexible_envelope && m.fits_on_stack(limits))
    };
    let (stack_alloc_request, stack_alloc_response) = match context {
        CallContext::Client => (written(request), read(response)),
        CallContext::Server => (read(request), written(response)),
    };
    ContextProps {
        stack_alloc_request,
        stack_alloc_response,
        stack_use_request: if stack_alloc_request { request.raw_size() } else { 0 },
        stack_use_response: if stack_alloc_response { response.raw_size() } else { 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(inline_size: u32, max_out_of_line: u32, flexible: bool) -> MessageLayout {
        MessageLayout {
            inline_size,
            max_out_of_line,
            has_flexible_envelope: flexible,
            ..MessageLayout::default()
        }
    }

    #[test]
    fn test_alignment() {
        assert_eq!(fidl_align(0), 0);
        assert_eq!(fidl_align(1), 8);
        assert_eq!(fidl_align(8), 8);
        assert_eq!(fidl_align(17), 24);
    }

    #[test]
    fn test_buffer_threshold_boundary() {
        let limits = TransportLimits::channel();
        let at = MessageBuffer::compute(512, 0, Boundedness::Bounded, &limits);
        assert_eq!(at.storage, BufferStorage::Inline);
        assert_eq!(at.type_name(), "::fidl::internal::InlineMessageBuffer<512>");

        let over = MessageBuffer::compute(513, 0, Boundedness::Bounded, &limits);
        assert_eq!(over.size, 520);
        assert_eq!(over.storage, BufferStorage::Boxed);
        assert_eq!(over.type_name(), "::fidl::internal::BoxedMessageBuffer<520>");
    }

    #[test]
    fn test_unbounded_and_oversized() {
        let limits = TransportLimits::channel();
        let flexible = MessageBuffer::compute(64, 0, Boundedness::Unbounded, &limits);
        assert_eq!(flexible.size, 65536);
        assert_eq!(
            flexible.type_name(),
            "::fidl::internal::BoxedMessageBuffer<ZX_CHANNEL_MAX_MSG_BYTES>"
        );

        let huge = MessageBuffer::compute(u32::MAX, u32::MAX, Boundedness::Bounded, &limits);
        assert_eq!(huge.size, 65536);
        assert_eq!(huge.size_text, "ZX_CHANNEL_MAX_MSG_BYTES");
    }

    #[test]
    fn test_client_server_mirror() {
        let limits = TransportLimits::channel();
        let request = layout(600, 0, false);
        let response = layout(64, 0, true);

        let client = context_props(CallContext::Client, &request, &response, &limits);
        assert!(!client.stack_alloc_request);
        assert!(!client.stack_alloc_response);
        assert_eq!(client.stack_use_request, 0);
        assert_eq!(client.stack_use_response, 0);

        let server = context_props(CallContext::Server, &request, &response, &limits);
        assert!(!server.stack_alloc_request);
        assert!(server.stack_alloc_response);
        assert_eq!(server.stack_use_response, 64);
    }

    #[test]
    fn test_empty_messages_stay_on_stack() {
        let limits = TransportLimits::channel();
        let mut request = layout(70000, 0, true);
        request.is_empty = true;
        let response = layout(32, 8, false);
        for context in [CallContext::Client, CallContext::Server] {
            let props = context_props(context, &request, &response, &limits);
            assert!(props.stack_alloc_request);
            assert!(props.stack_alloc_response);
            assert_eq!(props.stack_use_response, 40);
        }
    }

    #[test]
    fn test_response_stack_boundary() {
        let limits = TransportLimits::channel();
        let request = layout(16, 0, false);

        let at = context_props(CallContext::Client, &request, &layout(512, 0, false), &limits);
        assert!(at.stack_alloc_response);
        assert_eq!(at.stack_use_response, 512);

        let over = context_props(CallContext::Client, &request, &layout(513, 0, false), &limits);
        assert!(!over.stack_alloc_response);
        assert_eq!(over.stack_use_response, 0);

        let flexible = context_props(CallContext::Client, &request, &layout(512, 0, true), &limits);
        assert!(!flexible.stack_alloc_response);

        let server = context_props(CallContext::Server, &request, &layout(512, 0, true), &limits);
        assert!(server.stack_alloc_response);
    }

    #[test]
    fn test_oversized_message_with_large_threshold() {
        let limits = TransportLimits {
            max_message_size: 256,
            stack_alloc_threshold: 512,
            ..TransportLimits::channel()
        };
        let request = layout(1000, 0, false);
        let response = layout(64, 0, false);

        assert!(!request.fits_on_stack(&limits));
        let client = context_props(CallContext::Client, &request, &response, &limits);
        assert!(!client.stack_alloc_request);
        assert_eq!(client.stack_use_request, 0);
        assert!(client.stack_alloc_response);

        let buffer = request.bounded_buffer(&limits);
        assert_eq!(buffer.size, 256);
    }

    #[test]
    fn test_received_max_size() {
        assert_eq!(layout(64, 16, false).received_max_size(), 80);
        assert_eq!(layout(64, 16, true).received_max_size(), u32::MAX);
    }
}
