//! Host-facing extension table.
//!
//! A scripting host loads the plugin by calling [`init`] once and keeps the
//! returned [`Extension`]. Each entry takes the host's arguments as a slice
//! of [`Value`]s and returns one `Value`.
//!
//! | Name | Arguments | Returns |
//! |------|-----------|---------|
//! | `create` / `create_JavaVM` | `array` of option strings | `jvm::JavaVM` |
//! | `destroy_JavaVM` | `jvm::JavaVM` | `null` |
//! | `find_class` | `jvm::JavaVM`, `string` | `jvm::JavaClass` or `null` |
//! | `get_static_method` | `jvm::JavaVM`, `jvm::JavaClass`, `string`, `string` | `jvm::JavaMethod` or `null` |
//! | `call_static_void_method` | `jvm::JavaVM`, `jvm::JavaClass`, `jvm::JavaMethod`, `array` | `null` |
//!
//! Wrong arity or argument types are reported as [`CallError`]. A `null`
//! class or method is accepted and yields `null` / no-op.

use std::collections::BTreeMap;

use log::debug;

use crate::error::CallError;
use crate::vm::{ClassRef, MethodRef, VmHandle};

/// A value crossing the host boundary.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Str(String),
    List(Vec<Value>),
    Vm(VmHandle),
    Class(ClassRef),
    Method(MethodRef),
}

impl Value {
    /// The type name the host shows for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::List(_) => "array",
            Value::Vm(_) => "jvm::JavaVM",
            Value::Class(_) => "jvm::JavaClass",
            Value::Method(_) => "jvm::JavaMethod",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_vm(&self) -> Option<&VmHandle> {
        match self {
            Value::Vm(vm) => Some(vm),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<VmHandle> for Value {
    fn from(vm: VmHandle) -> Self {
        Value::Vm(vm)
    }
}

impl From<Option<ClassRef>> for Value {
    fn from(cls: Option<ClassRef>) -> Self {
        cls.map_or(Value::Null, Value::Class)
    }
}

impl From<Option<MethodRef>> for Value {
    fn from(mid: Option<MethodRef>) -> Self {
        mid.map_or(Value::Null, Value::Method)
    }
}

/// A callable registered in the extension table.
pub type NativeFn = fn(&[Value]) -> Result<Value, CallError>;

/// Immutable name → callable table handed to the host.
pub struct Extension {
    name: &'static str,
    functions: BTreeMap<&'static str, NativeFn>,
}

impl Extension {
    fn new(name: &'static str) -> Self {
        Extension {
            name,
            functions: BTreeMap::new(),
        }
    }

    fn register(mut self, name: &'static str, func: NativeFn) -> Self {
        self.functions.insert(name, func);
        self
    }

    /// Namespace the host binds the table under.
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get(&self, name: &str) -> Option<NativeFn> {
        self.functions.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn function_names(&self) -> Vec<&'static str> {
        self.functions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Look up `name` and call it with `args`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let func = self
            .get(name)
            .ok_or_else(|| CallError::UnknownFunction(name.to_string()))?;
        func(args)
    }
}

/// Build the extension table. Called once when the host loads the plugin.
pub fn init() -> Extension {
    Extension::new("jvm")
        .register("create", create_vm)
        .register("create_JavaVM", create_vm)
        .register("destroy_JavaVM", destroy_vm)
        .register("find_class", find_class)
        .register("get_static_method", get_static_method)
        .register("call_static_void_method", call_static_void_method)
}

// =============================================================================
// Argument helpers
// =============================================================================

fn check_arity(function: &'static str, args: &[Value], expected: usize) -> Result<(), CallError> {
    if args.len() != expected {
        return Err(CallError::Arity {
            function,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn mismatch(function: &'static str, index: usize, expected: &'static str, got: &Value) -> CallError {
    CallError::TypeMismatch {
        function,
        index,
        expected,
        got: got.type_name(),
    }
}

fn vm_arg<'a>(function: &'static str, args: &'a [Value], index: usize) -> Result<&'a VmHandle, CallError> {
    args[index]
        .as_vm()
        .ok_or_else(|| mismatch(function, index, "jvm::JavaVM", &args[index]))
}

fn str_arg<'a>(function: &'static str, args: &'a [Value], index: usize) -> Result<&'a str, CallError> {
    match &args[index] {
        Value::Str(s) => Ok(s),
        other => Err(mismatch(function, index, "string", other)),
    }
}

fn list_arg<'a>(function: &'static str, args: &'a [Value], index: usize) -> Result<&'a [Value], CallError> {
    match &args[index] {
        Value::List(items) => Ok(items),
        other => Err(mismatch(function, index, "array", other)),
    }
}

fn class_arg(function: &'static str, args: &[Value], index: usize) -> Result<Option<ClassRef>, CallError> {
    match &args[index] {
        Value::Null => Ok(None),
        Value::Class(cls) => Ok(Some(*cls)),
        other => Err(mismatch(function, index, "jvm::JavaClass", other)),
    }
}

fn method_arg(function: &'static str, args: &[Value], index: usize) -> Result<Option<MethodRef>, CallError> {
    match &args[index] {
        Value::Null => Ok(None),
        Value::Method(mid) => Ok(Some(*mid)),
        other => Err(mismatch(function, index, "jvm::JavaMethod", other)),
    }
}

// =============================================================================
// Callables
// =============================================================================

fn create_vm(args: &[Value]) -> Result<Value, CallError> {
    const NAME: &str = "create_JavaVM";
    check_arity(NAME, args, 1)?;
    let options = list_arg(NAME, args, 0)?
        .iter()
        .map(|opt| match opt {
            Value::Str(s) => Ok(s.as_str()),
            other => Err(mismatch(NAME, 0, "array of string", other)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Vm(VmHandle::create(options)?))
}

fn destroy_vm(args: &[Value]) -> Result<Value, CallError> {
    const NAME: &str = "destroy_JavaVM";
    check_arity(NAME, args, 1)?;
    vm_arg(NAME, args, 0)?.destroy();
    Ok(Value::Null)
}

fn find_class(args: &[Value]) -> Result<Value, CallError> {
    const NAME: &str = "find_class";
    check_arity(NAME, args, 2)?;
    let vm = vm_arg(NAME, args, 0)?;
    let name = str_arg(NAME, args, 1)?;
    Ok(vm.find_class(name).into())
}

fn get_static_method(args: &[Value]) -> Result<Value, CallError> {
    const NAME: &str = "get_static_method";
    check_arity(NAME, args, 4)?;
    let vm = vm_arg(NAME, args, 0)?;
    let class = class_arg(NAME, args, 1)?;
    let name = str_arg(NAME, args, 2)?;
    let signature = str_arg(NAME, args, 3)?;
    Ok(vm.get_static_method(class, name, signature).into())
}

fn call_static_void_method(args: &[Value]) -> Result<Value, CallError> {
    const NAME: &str = "call_static_void_method";
    check_arity(NAME, args, 4)?;
    let vm = vm_arg(NAME, args, 0)?;
    let class = class_arg(NAME, args, 1)?;
    let method = method_arg(NAME, args, 2)?;
    let call_args = list_arg(NAME, args, 3)?;
    // Call arguments are not forwarded; the zero-argument form is always used.
    if !call_args.is_empty() {
        debug!("{NAME}: ignoring {} call argument(s)", call_args.len());
    }
    vm.call_static_void_method(class, method);
    Ok(Value::Null)
}
