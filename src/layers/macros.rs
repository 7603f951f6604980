//! Boilerplate shared by layer implementations

/// Implements [`LayerTrait`](crate::layers::base::LayerTrait) for a struct holding its `LayerProperties` in `$field`
#[macro_export]
macro_rules! impl_layer_trait {
    ($layer:ty, $field:ident) => {
        impl $crate::layers::base::LayerTrait for $layer {
            fn properties(&self) -> &$crate::layers::base::LayerProperties {
                &self.$field
            }

            fn properties_mut(&mut self) -> &mut $crate::layers::base::LayerProperties {
                &mut self.$field
            }
        }
    };
}
