//! Synthesis module: the template model and the cloud assembly.

mod assembly;
mod template;

pub use assembly::{
    AssemblyStack, CloudAssembly, DEFAULT_OUTPUT_DIR, MANIFEST_FILE, MANIFEST_VERSION, Manifest,
    StackManifest, main_stack_name, waf_stack_name,
};
pub use template::{
    Output, RemovalPolicy, Resource, TEMPLATE_FORMAT_VERSION, Template, cfn_ref, get_att,
    logical_id_of, resolve_secret, resolve_ssm, sub, website_host,
};
