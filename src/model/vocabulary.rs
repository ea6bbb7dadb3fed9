//! Fixed vocabularies accepted by the gateway document.
//!
//! # Sets
//! - `Method`: HTTP methods shared by backends and endpoints
//! - `BackendEncoding`: how the gateway decodes an upstream response
//! - `EndpointEncoding`: how the gateway encodes the client response
//! - `Algorithm`: token signature algorithms for the auth validator
//!
//! The two encoding sets differ on purpose: only endpoints may `negotiate`,
//! only backends may decode `xml` or `rss`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::types::GeneratorError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = GeneratorError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(GeneratorError::invalid($kind, s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// HTTP method of an endpoint or backend call.
    Method, "method" {
        Get => "GET",
        Head => "HEAD",
        Options => "OPTIONS",
        Post => "POST",
        Put => "PUT",
        Patch => "PATCH",
        Delete => "DELETE",
        Connect => "CONNECT",
        Trace => "TRACE",
    }
}

vocabulary! {
    /// Decoding applied to a backend response.
    BackendEncoding, "backend encoding" {
        Json => "json",
        Xml => "xml",
        Rss => "rss",
        String => "string",
        NoOp => "no-op",
    }
}

vocabulary! {
    /// Encoding of the response returned to the client.
    EndpointEncoding, "endpoint encoding" {
        Json => "json",
        Negotiate => "negotiate",
        String => "string",
        NoOp => "no-op",
    }
}

vocabulary! {
    /// Signature algorithm checked by the token validator.
    Algorithm, "alg" {
        EdDsa => "EdDSA",
        Hs256 => "HS256",
        Hs384 => "HS384",
        Hs512 => "HS512",
        Rs256 => "RS256",
        Rs384 => "RS384",
        Rs512 => "RS512",
        Es256 => "ES256",
        Es384 => "ES384",
        Es512 => "ES512",
        Ps256 => "PS256",
        Ps384 => "PS384",
        Ps512 => "PS512",
    }
}

vocabulary! {
    /// Side of the proxied exchange a modifier applies to.
    Scope, "scope" {
        Request => "request",
        Response => "response",
    }
}
