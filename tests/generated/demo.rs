// Generated by resource-compiler. Do not edit.

static DEMO_RESOURCE_DATA: &[u8] = include_bytes!("demo.gresource");

pub static DEMO_RESOURCE: ::resource_bundle::StaticResource =
    ::resource_bundle::StaticResource::new(&DEMO_RESOURCE_DATA);

pub fn demo_get_resource() -> ::std::result::Result<::std::sync::Arc<::resource_bundle::BundleReader>, ::resource_bundle::ReadError> {
    DEMO_RESOURCE.get_resource()
}

pub fn demo_register_resource() -> ::std::result::Result<(), ::resource_bundle::ReadError> {
    DEMO_RESOURCE.init()
}

pub fn demo_unregister_resource() {
    DEMO_RESOURCE.fini()
}
