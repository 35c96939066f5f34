use std::marker::PhantomData;

/// Bytes of the last upload, so unchanged content is not written again
#[derive(Debug, Default)]
pub(crate) struct UploadCache {
    last: Option<Vec<u8>>,
}

impl UploadCache {
    /// Records `bytes` and returns whether they differ from the last upload
    pub(crate) fn needs_upload(&mut self, bytes: &[u8]) -> bool {
        if self.last.as_deref() == Some(bytes) {
            return false;
        }
        self.last = Some(bytes.to_vec());
        true
    }
}

/// Uniform buffer holding exactly one `T`
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    cache: UploadCache,
    content: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    /// Zero-filled until the first [`write`](Self::write)
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            cache: UploadCache::default(),
            content: PhantomData,
        }
    }

    /// Queues an upload of `content` unless it matches what the GPU already has
    pub fn write(&mut self, queue: &wgpu::Queue, content: &T) -> bool {
        let bytes = bytemuck::bytes_of(content);
        if !self.cache.needs_upload(bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_content_skips_upload() {
        let mut cache = UploadCache::default();
        assert!(cache.needs_upload(&[1, 2, 3]));
        assert!(!cache.needs_upload(&[1, 2, 3]));
        assert!(cache.needs_upload(&[1, 2, 4]));
        assert!(cache.needs_upload(&[1, 2, 3]));
    }

    #[test]
    fn test_first_upload_always_happens() {
        // A zeroed first frame must still reach the buffer
        let mut cache = UploadCache::default();
        assert!(cache.needs_upload(&[]));
        assert!(cache.needs_upload(&[0; 16]));
    }
}
