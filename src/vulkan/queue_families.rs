use std::collections::BTreeSet;

use ash::vk::{PhysicalDevice, QueueFamilyProperties, QueueFlags};

use crate::BootstrapError;

/// Anything that can report the queue families of a physical device.
pub trait QueueFamilySource {
    fn queue_family_properties(&self, physical_device: PhysicalDevice)
        -> Vec<QueueFamilyProperties>;
}

/// Anything that can tell whether a queue family can present to it.
pub trait PresentationSupport {
    fn supports_presentation(
        &self,
        physical_device: PhysicalDevice,
        queue_family_index: u32,
    ) -> Result<bool, BootstrapError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// family capable of running graphics related commands
    pub graphics_family: Option<u32>,
    /// family capable of displaying results on the surface
    pub present_family: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some()
    }

    /// Returns the resolved indices, or `None` if either family is missing.
    pub fn complete(&self) -> Option<CompleteQueueFamilies> {
        Some(CompleteQueueFamilies {
            graphics_family: self.graphics_family?,
            present_family: self.present_family?,
        })
    }
}

/// Queue family indices known to hold both a graphics and a present family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteQueueFamilies {
    pub graphics_family: u32,
    pub present_family: u32,
}

impl CompleteQueueFamilies {
    /// The distinct families, in ascending order.
    pub fn unique_families(&self) -> Vec<u32> {
        BTreeSet::from([self.graphics_family, self.present_family])
            .into_iter()
            .collect()
    }
}

/// Queries the queue families the physical device supports and records the first
/// family usable for graphics and the first one able to present to `surface`.
pub fn find_queue_families<Q, P>(
    instance: &Q,
    physical_device: PhysicalDevice,
    surface: &P,
) -> Result<QueueFamilyIndices, BootstrapError>
where
    Q: QueueFamilySource + ?Sized,
    P: PresentationSupport + ?Sized,
{
    let queue_family_properties = instance.queue_family_properties(physical_device);
    let mut indices = QueueFamilyIndices::default();

    for (index, properties) in (0u32..).zip(queue_family_properties.iter()) {
        if properties.queue_count == 0 {
            continue;
        }

        if indices.graphics_family.is_none()
            && properties.queue_flags.contains(QueueFlags::GRAPHICS)
        {
            indices.graphics_family = Some(index);
        }

        if indices.present_family.is_none()
            && surface.supports_presentation(physical_device, index)?
        {
            indices.present_family = Some(index);
        }

        if indices.is_complete() {
            break;
        }
    }

    Ok(indices)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use ash::vk::{self, Handle};

    use super::*;

    /// In-memory device description used to drive the prober and selector.
    #[derive(Default)]
    pub(crate) struct FakeDevice {
        pub families: Vec<QueueFamilyProperties>,
        pub presentable: Vec<u32>,
    }

    #[derive(Default)]
    pub(crate) struct FakeInstance {
        pub devices: HashMap<u64, FakeDevice>,
        pub order: Vec<PhysicalDevice>,
        pub probed: RefCell<Vec<PhysicalDevice>>,
    }

    impl FakeInstance {
        pub fn with_devices(devices: Vec<FakeDevice>) -> Self {
            let mut instance = Self::default();
            for (raw, device) in (1u64..).zip(devices) {
                instance.order.push(PhysicalDevice::from_raw(raw));
                instance.devices.insert(raw, device);
            }
            instance
        }
    }

    impl QueueFamilySource for FakeInstance {
        fn queue_family_properties(
            &self,
            physical_device: PhysicalDevice,
        ) -> Vec<QueueFamilyProperties> {
            self.probed.borrow_mut().push(physical_device);
            self.devices
                .get(&physical_device.as_raw())
                .map(|device| device.families.clone())
                .unwrap_or_default()
        }
    }

    impl PresentationSupport for FakeInstance {
        fn supports_presentation(
            &self,
            physical_device: PhysicalDevice,
            queue_family_index: u32,
        ) -> Result<bool, BootstrapError> {
            Ok(self
                .devices
                .get(&physical_device.as_raw())
                .map(|device| device.presentable.contains(&queue_family_index))
                .unwrap_or(false))
        }
    }

    pub(crate) fn family(flags: QueueFlags, queue_count: u32) -> QueueFamilyProperties {
        QueueFamilyProperties {
            queue_flags: flags,
            queue_count,
            ..Default::default()
        }
    }

    fn resolve(device: FakeDevice) -> QueueFamilyIndices {
        let instance = FakeInstance::with_devices(vec![device]);
        find_queue_families(&instance, instance.order[0], &instance).unwrap()
    }

    #[test]
    fn no_families_is_incomplete() {
        let indices = resolve(FakeDevice::default());
        assert_eq!(indices, QueueFamilyIndices::default());
        assert!(!indices.is_complete());
    }

    #[test]
    fn family_zero_is_a_valid_index() {
        let indices = resolve(FakeDevice {
            families: vec![family(QueueFlags::GRAPHICS, 1)],
            presentable: vec![0],
        });
        assert_eq!(indices.graphics_family, Some(0));
        assert_eq!(indices.present_family, Some(0));
        assert!(indices.is_complete());
    }

    #[test]
    fn first_matching_family_wins() {
        let indices = resolve(FakeDevice {
            families: vec![
                family(QueueFlags::COMPUTE, 1),
                family(QueueFlags::GRAPHICS, 1),
                family(QueueFlags::GRAPHICS, 1),
            ],
            presentable: vec![1, 2],
        });
        assert_eq!(
            indices.complete(),
            Some(CompleteQueueFamilies {
                graphics_family: 1,
                present_family: 1,
            })
        );
    }

    #[test]
    fn separate_graphics_and_present_families() {
        let indices = resolve(FakeDevice {
            families: vec![
                family(QueueFlags::GRAPHICS | QueueFlags::COMPUTE, 4),
                family(QueueFlags::TRANSFER, 1),
            ],
            presentable: vec![1],
        });
        assert_eq!(indices.graphics_family, Some(0));
        assert_eq!(indices.present_family, Some(1));
    }

    #[test]
    fn families_without_queues_are_skipped() {
        let indices = resolve(FakeDevice {
            families: vec![
                family(QueueFlags::GRAPHICS, 0),
                family(QueueFlags::GRAPHICS, 2),
            ],
            presentable: vec![0, 1],
        });
        assert_eq!(indices.graphics_family, Some(1));
        assert_eq!(indices.present_family, Some(1));
    }

    #[test]
    fn graphics_without_present_is_incomplete() {
        let indices = resolve(FakeDevice {
            families: vec![family(QueueFlags::GRAPHICS, 1)],
            presentable: vec![],
        });
        assert_eq!(indices.graphics_family, Some(0));
        assert_eq!(indices.present_family, None);
        assert!(indices.complete().is_none());
    }

    #[test]
    fn query_failure_propagates() {
        struct BrokenSurface;
        impl PresentationSupport for BrokenSurface {
            fn supports_presentation(
                &self,
                _physical_device: PhysicalDevice,
                _queue_family_index: u32,
            ) -> Result<bool, BootstrapError> {
                Err(BootstrapError::SurfaceQuery(vk::Result::ERROR_SURFACE_LOST_KHR))
            }
        }

        let instance = FakeInstance::with_devices(vec![FakeDevice {
            families: vec![family(QueueFlags::GRAPHICS, 1)],
            presentable: vec![0],
        }]);
        let result = find_queue_families(&instance, instance.order[0], &BrokenSurface);
        assert!(matches!(
            result,
            Err(BootstrapError::SurfaceQuery(vk::Result::ERROR_SURFACE_LOST_KHR))
        ));
    }

    #[test]
    fn shared_family_is_deduplicated() {
        let families = CompleteQueueFamilies {
            graphics_family: 2,
            present_family: 2,
        };
        assert_eq!(families.unique_families(), vec![2]);
    }

    #[test]
    fn distinct_families_are_sorted() {
        let families = CompleteQueueFamilies {
            graphics_family: 3,
            present_family: 1,
        };
        assert_eq!(families.unique_families(), vec![1, 3]);
    }
}
