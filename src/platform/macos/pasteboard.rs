//! The general NSPasteboard via Objective-C message sends.
//!
//! The snapshot walks every pasteboard item and every declared type so the
//! restore after a switch is byte-for-byte lossless.

use std::ffi::c_void;

use objc::runtime::Object;
use objc::{class, msg_send, sel, sel_impl};

use crate::clipboard::{Clipboard, ClipboardArchive, ClipboardItem};
use crate::error::SwitchError;

/// Creates an autoreleased `NSString` from a Rust string slice.
unsafe fn nsstring(s: &str) -> *mut Object {
    let bytes = s.as_ptr().cast::<c_void>();
    let len = s.len();
    let encoding: usize = 4; // NSUTF8StringEncoding

    msg_send![
        class!(NSString),
        stringWithBytes: bytes
        length: len
        encoding: encoding
    ]
}

/// Converts an `NSString` to a Rust `String`; empty for null.
unsafe fn nsstring_to_string(nsstring: *mut Object) -> String {
    if nsstring.is_null() {
        return String::new();
    }
    let c_str: *const i8 = msg_send![nsstring, UTF8String];
    if c_str.is_null() {
        return String::new();
    }
    std::ffi::CStr::from_ptr(c_str)
        .to_string_lossy()
        .into_owned()
}

/// Creates an autoreleased `NSData` copying `bytes`.
unsafe fn nsdata(bytes: &[u8]) -> *mut Object {
    msg_send![
        class!(NSData),
        dataWithBytes: bytes.as_ptr().cast::<c_void>()
        length: bytes.len()
    ]
}

/// Copies an `NSData`'s contents; empty for null.
unsafe fn nsdata_to_vec(data: *mut Object) -> Vec<u8> {
    if data.is_null() {
        return Vec::new();
    }
    let len: usize = msg_send![data, length];
    let ptr: *const u8 = msg_send![data, bytes];
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(ptr, len).to_vec()
}

/// The system-wide general pasteboard.
pub struct SystemPasteboard;

impl SystemPasteboard {
    unsafe fn general() -> *mut Object {
        msg_send![class!(NSPasteboard), generalPasteboard]
    }
}

impl Clipboard for SystemPasteboard {
    fn snapshot(&self) -> Result<ClipboardArchive, SwitchError> {
        unsafe {
            let pasteboard = Self::general();
            let items: *mut Object = msg_send![pasteboard, pasteboardItems];
            if items.is_null() {
                return Ok(ClipboardArchive::default());
            }
            let count: usize = msg_send![items, count];
            let mut archived_items = Vec::with_capacity(count);
            for i in 0..count {
                let item: *mut Object = msg_send![items, objectAtIndex: i];
                let types: *mut Object = msg_send![item, types];
                let type_count: usize = if types.is_null() {
                    0
                } else {
                    msg_send![types, count]
                };
                let mut archived = ClipboardItem::new();
                for t in 0..type_count {
                    let type_obj: *mut Object = msg_send![types, objectAtIndex: t];
                    let data: *mut Object = msg_send![item, dataForType: type_obj];
                    if data.is_null() {
                        continue;
                    }
                    archived.push(nsstring_to_string(type_obj), nsdata_to_vec(data));
                }
                archived_items.push(archived);
            }
            Ok(ClipboardArchive::new(archived_items))
        }
    }

    fn clear(&self) -> Result<(), SwitchError> {
        unsafe {
            let _: i64 = msg_send![Self::general(), clearContents];
        }
        Ok(())
    }

    fn write(&self, archive: &ClipboardArchive) -> Result<(), SwitchError> {
        unsafe {
            let pasteboard = Self::general();
            let array: *mut Object = msg_send![class!(NSMutableArray), array];
            for item in archive.items() {
                let pasteboard_item: *mut Object = msg_send![class!(NSPasteboardItem), new];
                for (type_id, payload) in item.reps() {
                    let type_obj = nsstring(type_id);
                    let data = nsdata(payload);
                    let _: bool = msg_send![pasteboard_item, setData: data forType: type_obj];
                }
                let _: () = msg_send![array, addObject: pasteboard_item];
                // `new` returns +1 retained; the array holds its own reference.
                let _: () = msg_send![pasteboard_item, release];
            }
            let ok: bool = msg_send![pasteboard, writeObjects: array];
            if !ok {
                return Err(SwitchError::Clipboard(
                    "NSPasteboard writeObjects failed".into(),
                ));
            }
        }
        Ok(())
    }

    fn read(&self, type_id: &str) -> Result<Option<Vec<u8>>, SwitchError> {
        unsafe {
            let type_obj = nsstring(type_id);
            let data: *mut Object = msg_send![Self::general(), dataForType: type_obj];
            if data.is_null() {
                Ok(None)
            } else {
                Ok(Some(nsdata_to_vec(data)))
            }
        }
    }
}
