// SPDX-License-Identifier: MIT
//! C translation unit embedding a bundle
//!
//! The data is emitted twice: as an octal integer list for MSVC, which limits
//! string literal length, and as a string literal for everything else. The
//! array is one byte longer than the bundle so both forms carry the same
//! trailing nul.

use super::CodegenOptions;

/// Toolchain shim registering the bundle before `main`
const CONSTRUCTORS: &str = include_str!("constructors.c.in");

const BYTES_PER_ROW: usize = 16;

/// Generate the C source for `data`
pub fn generate_c_source(data: &[u8], options: &CodegenOptions) -> String {
    let c_name = &options.c_name;
    let mut out = String::with_capacity(data.len() * 10 + CONSTRUCTORS.len() + 1024);

    out.push_str("#include <gio/gio.h>\n\n");
    out.push_str(&format!(
        "#if defined (__ELF__) && ( __GNUC__ > 2 || (__GNUC__ == 2 && __GNUC_MINOR__ >= 6))\n\
         # define SECTION __attribute__ ((section (\".gresource.{c_name}\"), aligned (8)))\n\
         #else\n\
         # define SECTION\n\
         #endif\n\n"
    ));

    let union_decl = format!(
        "union {{ const guint8 data[{}]; const double alignment; void * const ptr;}}  {c_name}_resource_data",
        data.len() + 1
    );

    if options.external_data {
        out.push_str(&format!("extern const SECTION {union_decl};\n"));
    } else {
        out.push_str("#ifdef _MSC_VER\n");
        out.push_str(&format!("static const SECTION {union_decl} = {{ {{\n"));
        write_integer_rows(&mut out, data);
        out.push_str("} };\n");
        out.push_str("#else /* _MSC_VER */\n");
        out.push_str(&format!("static const SECTION {union_decl} = {{\n"));
        write_string_rows(&mut out, data);
        out.push_str(" };\n");
        out.push_str("#endif /* !_MSC_VER */\n");
    }

    out.push_str(&format!(
        "\nstatic GStaticResource static_resource = {{ {c_name}_resource_data.data, sizeof ({c_name}_resource_data.data) - 1 /* nul terminator */, NULL, NULL, NULL }};\n"
    ));

    out.push_str(&format!(
        "\n{export}\nGResource *{c_name}_get_resource (void);\n\
         GResource *{c_name}_get_resource (void)\n\
         {{\n  return g_static_resource_get_resource (&static_resource);\n}}\n",
        export = options.export()
    ));

    if options.manual_register {
        for (action, call) in [("unregister", "fini"), ("register", "init")] {
            out.push_str(&format!(
                "\n{export}\nvoid {c_name}_{action}_resource (void);\n\
                 void {c_name}_{action}_resource (void)\n\
                 {{\n  g_static_resource_{call} (&static_resource);\n}}\n",
                export = options.export()
            ));
        }
    } else {
        out.push_str(CONSTRUCTORS);
    }

    out
}

fn write_integer_rows(out: &mut String, data: &[u8]) {
    let last = data.len().saturating_sub(1);
    for (i, byte) in data.iter().enumerate() {
        if i % BYTES_PER_ROW == 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("0{:03o}", byte));
        if i != last {
            out.push_str(", ");
        }
        if i % BYTES_PER_ROW == BYTES_PER_ROW - 1 || i == last {
            out.push('\n');
        }
    }
}

fn write_string_rows(out: &mut String, data: &[u8]) {
    for (i, byte) in data.iter().enumerate() {
        if i % BYTES_PER_ROW == 0 {
            out.push_str("  \"");
        }
        out.push_str(&format!("\\{:03o}", byte));
        if i % BYTES_PER_ROW == BYTES_PER_ROW - 1 {
            out.push_str("\"\n");
        }
    }
    if data.len() % BYTES_PER_ROW != 0 {
        out.push('"');
    }
}
