//! Reserved-word escaping
//!
//! Identifiers that collide with C++ keywords, fixed-width integer typedefs or
//! common C macros are rewritten through a closed table. Every rewrite is
//! itself unreserved, so escaping is idempotent.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// `(reserved word, rewrite)` pairs
const RESERVED_WORDS: &[(&str, &str)] = &[
    // C++ keywords
    ("alignas", "alignas_"),
    ("alignof", "alignof_"),
    ("and", "and_"),
    ("and_eq", "and_eq_"),
    ("asm", "asm_"),
    ("auto", "auto_"),
    ("bitand", "bitand_"),
    ("bitor", "bitor_"),
    ("bool", "bool_"),
    ("break", "break_"),
    ("case", "case_"),
    ("catch", "catch_"),
    ("char", "char_"),
    ("char8_t", "char8_t_"),
    ("char16_t", "char16_t_"),
    ("char32_t", "char32_t_"),
    ("class", "class_"),
    ("co_await", "co_await_"),
    ("co_return", "co_return_"),
    ("co_yield", "co_yield_"),
    ("compl", "compl_"),
    ("concept", "concept_"),
    ("const", "const_"),
    ("const_cast", "const_cast_"),
    ("consteval", "consteval_"),
    ("constexpr", "constexpr_"),
    ("constinit", "constinit_"),
    ("continue", "continue_"),
    ("decltype", "decltype_"),
    ("default", "default_"),
    ("delete", "delete_"),
    ("do", "do_"),
    ("double", "double_"),
    ("dynamic_cast", "dynamic_cast_"),
    ("else", "else_"),
    ("enum", "enum_"),
    ("explicit", "explicit_"),
    ("export", "export_"),
    ("extern", "extern_"),
    ("false", "false_"),
    ("float", "float_"),
    ("for", "for_"),
    ("friend", "friend_"),
    ("goto", "goto_"),
    ("if", "if_"),
    ("inline", "inline_"),
    ("int", "int_"),
    ("long", "long_"),
    ("mutable", "mutable_"),
    ("namespace", "namespace_"),
    ("new", "new_"),
    ("noexcept", "noexcept_"),
    ("not", "not_"),
    ("not_eq", "not_eq_"),
    ("nullptr", "nullptr_"),
    ("operator", "operator_"),
    ("or", "or_"),
    ("or_eq", "or_eq_"),
    ("private", "private_"),
    ("protected", "protected_"),
    ("public", "public_"),
    ("register", "register_"),
    ("reinterpret_cast", "reinterpret_cast_"),
    ("requires", "requires_"),
    ("return", "return_"),
    ("short", "short_"),
    ("signed", "signed_"),
    ("sizeof", "sizeof_"),
    ("static", "static_"),
    ("static_assert", "static_assert_"),
    ("static_cast", "static_cast_"),
    ("struct", "struct_"),
    ("switch", "switch_"),
    ("template", "template_"),
    ("this", "this_"),
    ("thread_local", "thread_local_"),
    ("throw", "throw_"),
    ("true", "true_"),
    ("try", "try_"),
    ("typedef", "typedef_"),
    ("typeid", "typeid_"),
    ("typename", "typename_"),
    ("union", "union_"),
    ("unsigned", "unsigned_"),
    ("using", "using_"),
    ("virtual", "virtual_"),
    ("void", "void_"),
    ("volatile", "volatile_"),
    ("wchar_t", "wchar_t_"),
    ("while", "while_"),
    ("xor", "xor_"),
    ("xor_eq", "xor_eq_"),
    // Fixed-width integer typedefs
    ("int8_t", "int8_t_"),
    ("int16_t", "int16_t_"),
    ("int32_t", "int32_t_"),
    ("int64_t", "int64_t_"),
    ("uint8_t", "uint8_t_"),
    ("uint16_t", "uint16_t_"),
    ("uint32_t", "uint32_t_"),
    ("uint64_t", "uint64_t_"),
    ("uintptr_t", "uintptr_t_"),
    ("size_t", "size_t_"),
    ("ssize_t", "ssize_t_"),
    // Macros and globals from the C runtime
    ("assert", "assert_"),
    ("errno", "errno_"),
    ("offsetof", "offsetof_"),
    ("stdin", "stdin_"),
    ("stdout", "stdout_"),
    ("stderr", "stderr_"),
    ("EOF", "EOF_"),
    ("NULL", "NULL_"),
    ("FILE", "FILE_"),
];

lazy_static! {
    static ref RESERVED: HashMap<&'static str, &'static str> =
        RESERVED_WORDS.iter().copied().collect();
}

/// Whether `ident` is in the reserved table
pub fn is_reserved(ident: &str) -> bool {
    RESERVED.contains_key(ident)
}

/// Rewrite `ident` if it is reserved, otherwise return it unchanged
pub fn change_if_reserved(ident: &str) -> String {
    match RESERVED.get(ident) {
        Some(rewrite) => (*rewrite).to_string(),
        None => ident.to_string(),
    }
}

/// The full table, for tooling that wants to display it
pub fn reserved_words() -> impl Iterator<Item = (&'static str, &'static str)> {
    RESERVED_WORDS.iter().copied()
}
