// SPDX-License-Identifier: MIT
//! C header declaring the generated accessors

use super::CodegenOptions;

pub fn generate_c_header(options: &CodegenOptions) -> String {
    let c_name = &options.c_name;
    let linkage = options.linkage();

    let mut out = format!(
        "#ifndef __RESOURCE_{c_name}_H__\n\
         #define __RESOURCE_{c_name}_H__\n\
         \n\
         #include <gio/gio.h>\n\
         \n\
         {linkage} GResource *{c_name}_get_resource (void);\n"
    );

    if options.manual_register {
        out.push_str(&format!(
            "\n{linkage} void {c_name}_register_resource (void);\n\
             {linkage} void {c_name}_unregister_resource (void);\n\n"
        ));
    }

    out.push_str("#endif\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        let header = generate_c_header(&CodegenOptions::new("resources").unwrap());
        assert_eq!(
            header,
            "#ifndef __RESOURCE_resources_H__\n\
             #define __RESOURCE_resources_H__\n\
             \n\
             #include <gio/gio.h>\n\
             \n\
             extern GResource *resources_get_resource (void);\n\
             #endif\n"
        );
    }

    #[test]
    fn test_manual_register_internal_header() {
        let mut options = CodegenOptions::new("app").unwrap();
        options.manual_register = true;
        options.internal = true;
        let header = generate_c_header(&options);
        assert!(header.contains("G_GNUC_INTERNAL GResource *app_get_resource (void);\n"));
        assert!(header.contains("G_GNUC_INTERNAL void app_register_resource (void);\n"));
        assert!(header.contains("G_GNUC_INTERNAL void app_unregister_resource (void);\n"));
        assert!(header.ends_with("\n\n#endif\n"));
    }
}
