// Generated by resource-compiler. Do not edit.

static RESOURCES_RESOURCE_DATA: [u8; 281] = [
    0x47, 0x56, 0x61, 0x72, 0x69, 0x61, 0x6e, 0x74, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x90, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x28, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
    0xd4, 0xb5, 0x02, 0x00, 0xff, 0xff, 0xff, 0xff, 0x90, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x4c, 0x00, 0x94, 0x00, 0x00, 0x00, 0x98, 0x00, 0x00, 0x00,
    0xbd, 0x00, 0x62, 0x2b, 0x02, 0x00, 0x00, 0x00, 0x98, 0x00, 0x00, 0x00,
    0x0d, 0x00, 0x76, 0x00, 0xa8, 0x00, 0x00, 0x00, 0xd0, 0x00, 0x00, 0x00,
    0x76, 0x05, 0x36, 0x1b, 0x00, 0x00, 0x00, 0x00, 0xd0, 0x00, 0x00, 0x00,
    0x07, 0x00, 0x4c, 0x00, 0xd8, 0x00, 0x00, 0x00, 0xe0, 0x00, 0x00, 0x00,
    0x3e, 0x19, 0x74, 0x2b, 0x02, 0x00, 0x00, 0x00, 0xe0, 0x00, 0x00, 0x00,
    0x0d, 0x00, 0x76, 0x00, 0xf0, 0x00, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00,
    0x2f, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x72, 0x65, 0x73, 0x6f,
    0x75, 0x72, 0x63, 0x65, 0x31, 0x2e, 0x74, 0x78, 0x74, 0x00, 0x00, 0x00,
    0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x74, 0x68, 0x69, 0x73,
    0x20, 0x69, 0x73, 0x20, 0x61, 0x20, 0x74, 0x65, 0x73, 0x74, 0x20, 0x72,
    0x65, 0x73, 0x6f, 0x75, 0x72, 0x63, 0x65, 0x0a, 0x00, 0x00, 0x28, 0x75,
    0x75, 0x61, 0x79, 0x29, 0x61, 0x73, 0x73, 0x65, 0x74, 0x73, 0x2f, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x72, 0x65, 0x73, 0x6f,
    0x75, 0x72, 0x63, 0x65, 0x32, 0x2e, 0x74, 0x78, 0x74, 0x00, 0x00, 0x00,
    0x19, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x74, 0x68, 0x69, 0x73,
    0x20, 0x69, 0x73, 0x20, 0x74, 0x65, 0x73, 0x74, 0x20, 0x72, 0x65, 0x73,
    0x6f, 0x75, 0x72, 0x63, 0x65, 0x20, 0x23, 0x32, 0x0a, 0x00, 0x00, 0x28,
    0x75, 0x75, 0x61, 0x79, 0x29,
];

pub static RESOURCES_RESOURCE: ::resource_bundle::StaticResource =
    ::resource_bundle::StaticResource::new(&RESOURCES_RESOURCE_DATA);

pub fn resources_get_resource() -> ::std::result::Result<::std::sync::Arc<::resource_bundle::BundleReader>, ::resource_bundle::ReadError> {
    RESOURCES_RESOURCE.get_resource()
}

pub fn resources_register_resource() -> ::std::result::Result<(), ::resource_bundle::ReadError> {
    RESOURCES_RESOURCE.init()
}

pub fn resources_unregister_resource() {
    RESOURCES_RESOURCE.fini()
}
