//! Prelude module for convenient imports.
//!
//! ```ignore
//! use casd_client::prelude::*;
//! ```

pub use crate::{
    ApiRequest, Body, Call, Client, ClientConfig, Decoded, Error, Form, ParamValue, Params, Part,
    PartBody, Response, Result, SendOptions, Transport, build_query, decode,
};
