//! Example: drive an embedded JVM through the plugin's extension table.
//!
//! Run with:
//!   JAVA_HOME=/path/to/jdk cargo run --example embed

use std::error::Error;

use jvm_plugin::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    let ext = jvm_plugin::plugin::init();
    println!("{} exports {:?}", ext.name(), ext.function_names());

    let options = Value::List(vec!["-Xms64m".into(), "-Xmx256m".into()]);
    let vm = ext.call("create_JavaVM", &[options])?;

    let system = ext.call("find_class", &[vm.clone(), "java/lang/System".into()])?;
    let gc = ext.call(
        "get_static_method",
        &[vm.clone(), system.clone(), "gc".into(), "()V".into()],
    )?;
    println!("System.gc resolved: {}", !gc.is_null());

    ext.call("call_static_void_method", &[vm.clone(), system, gc, Value::List(vec![])])?;

    let missing = ext.call("find_class", &[vm.clone(), "NoSuchClass123".into()])?;
    println!("NoSuchClass123 -> {}", missing.type_name());

    ext.call("destroy_JavaVM", &[vm])?;
    Ok(())
}
