// Copyright 2023 Vivek Panyam
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use proc_macro::TokenStream;
use quote::quote;

// Nested repeating macros get complex with declarative macros
// so we'll use a proc macro instead
// https://github.com/rust-lang/rust/issues/35853
//
// Each tuple is (enum variant, rust type, wire identifier). The `BYTES`
// datatype is intentionally not part of this list: its payload is a flat
// byte buffer rather than a typed vector, so code handles it explicitly.
#[proc_macro]
pub fn for_each_dtype(item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    quote! {

            // Declare the inner macro
            macro_rules! inner {
                ($( ( $DtypeName:ident, $RustType:ty, $TypeStr:literal ) ), * ) => {
                    #item
                };
            }

            // Call it for each type
            inner!(
                (Float, f32, "FP32"),
                (Double, f64, "FP64"),
                (Bool, bool, "BOOL"),
                (I8, i8, "INT8"),
                (I16, i16, "INT16"),
                (I32, i32, "INT32"),
                (I64, i64, "INT64"),
                (U8, u8, "UINT8"),
                (U16, u16, "UINT16"),
                (U32, u32, "UINT32"),
                (U64, u64, "UINT64")
            );
    }
    .into()
}

#[proc_macro]
pub fn for_each_numeric_dtype(item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    quote! {

            // Declare the inner macro
            macro_rules! inner {
                ($( ( $DtypeName:ident, $RustType:ty, $TypeStr:literal ) ), * ) => {
                    #item
                };
            }

            // Call it for each type
            inner!(
                (Float, f32, "FP32"),
                (Double, f64, "FP64"),
                (I8, i8, "INT8"),
                (I16, i16, "INT16"),
                (I32, i32, "INT32"),
                (I64, i64, "INT64"),
                (U8, u8, "UINT8"),
                (U16, u16, "UINT16"),
                (U32, u32, "UINT32"),
                (U64, u64, "UINT64")
            );
    }
    .into()
}
