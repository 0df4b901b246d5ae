use proc_macro::TokenStream;

use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token::Comma,
    Attribute, Data, DeriveInput, Error, Expr, Fields, GenericParam, Index, LitInt, Meta, Token,
    Type,
};

fn get_generic_names(generic_params: &Punctuated<GenericParam, Comma>) -> TokenStream2 {
    use GenericParam::*;

    let generics = generic_params.iter().map(|param| match param {
        Type(type_param) => type_param.ident.to_token_stream(),
        Lifetime(lifetime_def) => lifetime_def.lifetime.to_token_stream(),
        Const(const_param) => const_param.ident.to_token_stream(),
    });
    quote!(#(#generics,)*)
}

fn find_repr(attrs: &[Attribute], span: Span) -> syn::Result<Type> {
    let Some(repr) = attrs.iter().find(|attr| attr.path().is_ident("repr")) else {
        return Err(Error::new(span, "No explicit repr"));
    };
    repr.parse_args::<Type>()
}

/// Field names as they show up in trace records: the identifier for named
/// fields and the position for tuple fields.
fn field_labels(fields: &Fields) -> Vec<String> {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| match &f.ident {
            Some(ident) => ident.to_string(),
            None => i.to_string(),
        })
        .collect()
}

fn read_field(owner: &str, label: &str) -> TokenStream2 {
    quote! {
        {
            let value = ::jdwp::codec::JdwpReadable::read(read)?;
            read.trace_field(#owner, #label);
            value
        }
    }
}

fn read_fields(owner: &str, fields: &Fields) -> TokenStream2 {
    let labels = field_labels(fields);
    match fields {
        Fields::Unit => quote!(),
        Fields::Named(named) => {
            let fields = named.named.iter().zip(&labels).map(|(f, label)| {
                // we are in the Named branch so this is not None
                let name = f.ident.as_ref().unwrap();
                let value = read_field(owner, label);
                quote!(#name: #value)
            });
            quote!({ #(#fields),* })
        }
        Fields::Unnamed(_) => {
            let fields = labels.iter().map(|label| read_field(owner, label));
            quote!(( #(#fields),* ))
        }
    }
}

#[proc_macro_derive(JdwpReadable)]
pub fn jdwp_readable(item: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(item as DeriveInput);
    match derive_readable(derive_input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_readable(derive_input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &derive_input.ident;
    let generic_params = &derive_input.generics.params;
    let generic_names = get_generic_names(generic_params);
    let generics_where = &derive_input.generics.where_clause;

    let body = match &derive_input.data {
        Data::Struct(struct_data) => {
            let constructor = read_fields(&ident.to_string(), &struct_data.fields);
            quote!(Ok(Self #constructor))
        }
        Data::Enum(enum_data) => {
            let repr = find_repr(&derive_input.attrs, enum_data.enum_token.span)?;

            let mut match_arms = Vec::with_capacity(enum_data.variants.len());
            for v in &enum_data.variants {
                let Some((_, ref d)) = v.discriminant else {
                    return Err(Error::new(v.span(), "No explicit discriminant"));
                };
                let name = &v.ident;
                let constructor = read_fields(&format!("{ident}::{name}"), &v.fields);
                match_arms.push(quote!(x if x == (#d) => Self::#name #constructor));
            }
            let kind = ident.to_string();
            quote! {
                let res = match <#repr as ::jdwp::codec::JdwpReadable>::read(read)? {
                    #(#match_arms,)*
                    other => {
                        return Err(::jdwp::codec::CodecError::UnknownDiscriminant {
                            kind: #kind,
                            value: other as i64,
                        }
                        .into())
                    }
                };
                Ok(res)
            }
        }
        Data::Union(union_data) => {
            return Err(Error::new(
                union_data.union_token.span,
                "Can derive JdwpReadable only for structs and enums with explicit discriminants",
            ))
        }
    };

    Ok(quote! {
        impl<#generic_params> ::jdwp::codec::JdwpReadable for #ident<#generic_names> #generics_where {
            fn read<R: ::std::io::Read>(read: &mut ::jdwp::codec::JdwpReader<R>) -> ::std::io::Result<Self> {
                #body
            }
        }
    })
}

#[proc_macro_derive(JdwpWritable)]
pub fn jdwp_writable(item: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(item as DeriveInput);
    match derive_writable(derive_input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_writable(derive_input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &derive_input.ident;
    let generic_params = &derive_input.generics.params;
    let generic_names = get_generic_names(generic_params);
    let generics_where = &derive_input.generics.where_clause;

    let body = match &derive_input.data {
        Data::Struct(struct_data) => {
            let owner = ident.to_string();
            let labels = field_labels(&struct_data.fields);
            let writes = struct_data.fields.iter().zip(&labels).enumerate().map(|(i, (f, label))| {
                let access = match &f.ident {
                    Some(name) => quote!(self.#name),
                    None => {
                        let idx = Index::from(i);
                        quote!(self.#idx)
                    }
                };
                quote! {
                    ::jdwp::codec::JdwpWritable::write(&#access, write)?;
                    write.trace_field(#owner, #label);
                }
            });
            quote!(#(#writes)*)
        }
        Data::Enum(enum_data) => {
            let repr = find_repr(&derive_input.attrs, enum_data.enum_token.span)?;

            let mut match_arms = Vec::with_capacity(enum_data.variants.len());
            for v in &enum_data.variants {
                let Some((_, ref d)) = v.discriminant else {
                    return Err(Error::new(v.span(), "No explicit discriminant"));
                };
                let name = &v.ident;
                let owner = format!("{ident}::{name}");
                let labels = field_labels(&v.fields);

                let bindings = match &v.fields {
                    Fields::Named(named) => named
                        .named
                        .iter()
                        .map(|f| f.ident.clone().unwrap())
                        .collect::<Vec<_>>(),
                    _ => (0..v.fields.len())
                        .map(|i| Ident::new(&format!("case_{i}"), v.fields.span()))
                        .collect(),
                };
                let destruct = match &v.fields {
                    Fields::Named(_) => quote!({ #(#bindings),* }),
                    Fields::Unnamed(_) => quote!(( #(#bindings),* )),
                    Fields::Unit => quote!(),
                };
                let writes = bindings.iter().zip(&labels).map(|(binding, label)| {
                    quote! {
                        ::jdwp::codec::JdwpWritable::write(#binding, write)?;
                        write.trace_field(#owner, #label);
                    }
                });

                match_arms.push(quote! {
                    Self::#name #destruct => {
                        <#repr as ::jdwp::codec::JdwpWritable>::write(&(#d), write)?;
                        #(#writes)*
                    }
                });
            }
            quote! {
                match self {
                    #(#match_arms)*
                }
            }
        }
        Data::Union(union_data) => {
            return Err(Error::new(
                union_data.union_token.span,
                "Can derive JdwpWritable only for structs and enums with explicit discriminants",
            ))
        }
    };

    Ok(quote! {
        impl<#generic_params> ::jdwp::codec::JdwpWritable for #ident<#generic_names> #generics_where {
            fn write<W: ::std::io::Write>(&self, write: &mut ::jdwp::codec::JdwpWriter<W>) -> ::std::io::Result<()> {
                #body
                Ok(())
            }
        }
    })
}

struct CommandAttr {
    reply_type: Type,
    command: ShortCommandAttr,
}

impl Parse for CommandAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let reply_type = input.parse()?;
        let _ = input.parse::<Token![,]>()?;
        Ok(CommandAttr {
            reply_type,
            command: input.parse()?,
        })
    }
}

struct ShortCommandAttr {
    command_set: LitInt,
    command_id: LitInt,
}

impl ShortCommandAttr {
    fn long(self, reply_type: Type) -> CommandAttr {
        CommandAttr {
            reply_type,
            command: self,
        }
    }
}

impl Parse for ShortCommandAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let command_set = input.parse()?;
        let _ = input.parse::<Token![,]>()?;
        Ok(ShortCommandAttr {
            command_set,
            command_id: input.parse()?,
        })
    }
}

/// Binds a command struct to its `(command set, command)` pair and its reply
/// type, and generates a `new` constructor taking the fields in wire order.
///
/// The reply type defaults to `<StructName>Reply` when only the two numbers
/// are given.
#[proc_macro_attribute]
pub fn jdwp_command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(item as syn::ItemStruct);

    let attr = syn::parse::<CommandAttr>(attr.clone()).or_else(|_| {
        syn::parse::<ShortCommandAttr>(attr)
            .and_then(|sca| syn::parse_str(&format!("{}Reply", item.ident)).map(|t| sca.long(t)))
    });
    let CommandAttr {
        reply_type,
        command: ShortCommandAttr {
            command_set,
            command_id,
        },
    } = match attr {
        Ok(attr) => attr,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &item.ident;
    let generic_params = &item.generics.params;
    let generic_names = get_generic_names(generic_params);
    let generics_where = &item.generics.where_clause;

    let new = if item.fields.is_empty() {
        quote!()
    } else {
        let mut docs = Vec::with_capacity(item.fields.len());
        let mut typed_idents = Vec::with_capacity(item.fields.len());
        let mut idents = Vec::with_capacity(item.fields.len());
        for f in &item.fields {
            let Some(ref ident) = f.ident else {
                return Error::new(item.fields.span(), "Command struct must use named fields")
                    .to_compile_error()
                    .into();
            };
            let ty = &f.ty;

            // strings are the only parameters worth the `impl Into` sugar
            let string_magic = quote!(#ty).to_string() == "String";

            typed_idents.push(if string_magic {
                quote!(#ident: impl Into<String>)
            } else {
                quote!(#ident: #ty)
            });

            let doc = f.attrs.iter().find_map(|a| match &a.meta {
                Meta::NameValue(nv) if nv.path.is_ident("doc") => Some(&nv.value),
                _ => None,
            });
            docs.push(doc.map(|doc: &Expr| {
                let name = format!(" - `{ident}`:");
                quote! {
                    #[doc = #name]
                    #[doc = #doc]
                }
            }));

            idents.push(if string_magic {
                quote!(#ident: #ident.into())
            } else {
                quote!(#ident)
            });
        }
        quote! {
            impl<#generic_params> #ident<#generic_names> #generics_where {
                /// Creates the command from its parameters, in wire order.
                ///
                /// ### Arguments:
                #(#docs)*
                pub fn new(#(#typed_idents,)*) -> Self {
                    Self { #(#idents,)* }
                }
            }
        }
    };

    let tokens = quote! {
        #item
        #new

        impl<#generic_params> ::jdwp::spec::Command for #ident<#generic_names> #generics_where {
            const ID: ::jdwp::spec::CommandId = ::jdwp::spec::CommandId::new(#command_set, #command_id);
            type Output = #reply_type;
        }
    };
    tokens.into()
}
